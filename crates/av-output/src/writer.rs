//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, SignalRow, TickSummaryRow, VehicleRow};

/// A telemetry sink.
///
/// Errors are stored by [`TelemetryObserver`][crate::TelemetryObserver] and
/// retrieved with its `take_error` once the run is over.
pub trait OutputWriter {
    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()>;

    fn write_signals(&mut self, rows: &[SignalRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
