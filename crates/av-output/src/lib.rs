//! `av-output`: telemetry writers for the rust_av framework.
//!
//! | Backend | Files created                                         |
//! |---------|-------------------------------------------------------|
//! | CSV     | `vehicles.csv`, `signals.csv`, `tick_summaries.csv`   |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`TelemetryObserver`], which implements `av_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use av_output::{CsvWriter, TelemetryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TelemetryObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{vehicle_row, TelemetryObserver};
pub use row::{SignalRow, TickSummaryRow, VehicleRow};
pub use writer::OutputWriter;
