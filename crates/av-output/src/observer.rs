//! `TelemetryObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use av_core::{SimTime, Tick};
use av_sim::{SignalSite, SimObserver, Vehicle};

use crate::row::{SignalRow, TickSummaryRow, VehicleRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes vehicle and signal snapshots plus per-step
/// summaries to any [`OutputWriter`].
///
/// `SimObserver` hooks cannot fail, so the first write error is stored and
/// later writes still run.  Check [`take_error`][Self::take_error] after
/// `sim.run()` returns.
pub struct TelemetryObserver<W: OutputWriter> {
    writer:     W,
    summaries:  bool,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TelemetryObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, summaries: true, last_error: None }
    }

    /// Skip the per-step summary rows (snapshots only).
    pub fn without_summaries(mut self) -> Self {
        self.summaries = false;
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// Flatten one vehicle into a row.
pub fn vehicle_row(tick: Tick, now: SimTime, vehicle: &Vehicle) -> VehicleRow {
    let out = vehicle.output();
    VehicleRow {
        tick:         tick.0,
        time_secs:    now.as_secs_f64(),
        vehicle_id:   vehicle.id.0,
        controlled:   vehicle.is_controlled(),
        x:            vehicle.body.position.x,
        y:            vehicle.body.position.y,
        yaw:          vehicle.body.yaw,
        speed:        out.speed,
        target_speed: out.target_speed,
        steer:        out.steer,
        lane_offset:  out.lane_offset,
        behavior:     out.behavior,
        panicking:    vehicle.is_panicking(),
    }
}

impl<W: OutputWriter> SimObserver for TelemetryObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, controlled: usize) {
        if !self.summaries {
            return;
        }
        let row = TickSummaryRow { tick: tick.0, controlled_vehicles: controlled as u64 };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, now: SimTime, vehicles: &[Vehicle], signals: &[SignalSite]) {
        if !vehicles.is_empty() {
            let rows: Vec<VehicleRow> = vehicles.iter().map(|v| vehicle_row(tick, now, v)).collect();
            let result = self.writer.write_vehicles(&rows);
            self.store_err(result);
        }

        if !signals.is_empty() {
            let rows: Vec<SignalRow> = signals
                .iter()
                .map(|s| SignalRow {
                    tick:      tick.0,
                    time_secs: now.as_secs_f64(),
                    signal_id: s.signal.id().0,
                    phase:     s.signal.phase(),
                })
                .collect();
            let result = self.writer.write_signals(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
