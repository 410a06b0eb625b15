//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `vehicles.csv`
//! - `signals.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SignalRow, TickSummaryRow, VehicleRow};

pub const VEHICLE_HEADER: [&str; 13] = [
    "tick", "time_secs", "vehicle_id", "controlled", "x", "y", "yaw",
    "speed", "target_speed", "steer", "lane_offset", "behavior", "panicking",
];
pub const SIGNAL_HEADER: [&str; 4] = ["tick", "time_secs", "signal_id", "phase"];
pub const SUMMARY_HEADER: [&str; 2] = ["tick", "controlled_vehicles"];

/// Writes telemetry to three CSV files.
pub struct CsvWriter {
    vehicles:  Writer<File>,
    signals:   Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut vehicles = Writer::from_path(dir.join("vehicles.csv"))?;
        vehicles.write_record(VEHICLE_HEADER)?;

        let mut signals = Writer::from_path(dir.join("signals.csv"))?;
        signals.write_record(SIGNAL_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { vehicles, signals, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        for row in rows {
            self.vehicles.write_record(&[
                row.tick.to_string(),
                format!("{:.3}", row.time_secs),
                row.vehicle_id.to_string(),
                (row.controlled as u8).to_string(),
                format!("{:.2}", row.x),
                format!("{:.2}", row.y),
                format!("{:.4}", row.yaw),
                format!("{:.2}", row.speed),
                format!("{:.2}", row.target_speed),
                format!("{:.4}", row.steer),
                format!("{:.2}", row.lane_offset),
                row.behavior.as_str().to_owned(),
                (row.panicking as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_signals(&mut self, rows: &[SignalRow]) -> OutputResult<()> {
        for row in rows {
            self.signals.write_record(&[
                row.tick.to_string(),
                format!("{:.3}", row.time_secs),
                row.signal_id.to_string(),
                row.phase.as_str().to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.controlled_vehicles.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.vehicles.flush()?;
        self.signals.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
