//! CSV signal-plan loader.
//!
//! # CSV format
//!
//! One row per signal.  `signal_id` values must be dense (`0..n`), in any
//! order.
//!
//! ```csv
//! signal_id,go_secs,caution_secs,stop_secs,initial_phase
//! 0,10,3,8,go
//! 1,20,4,12,Stop
//! ```
//!
//! `initial_phase` is one of `go`, `caution`, `stop` (case-insensitive).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use av_core::SignalId;

use crate::signal::{Phase, SignalTiming, TrafficSignal};
use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SignalRecord {
    signal_id:     u32,
    go_secs:       f32,
    caution_secs:  f32,
    stop_secs:     f32,
    initial_phase: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load traffic signals from a CSV file.
///
/// Returns a `Vec` indexed by `SignalId`.
pub fn load_signals_csv(path: &Path) -> Result<Vec<TrafficSignal>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_signals_reader(file)
}

/// Like [`load_signals_csv`] but accepts any `Read` source.
pub fn load_signals_reader<R: Read>(reader: R) -> Result<Vec<TrafficSignal>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_id: BTreeMap<u32, TrafficSignal> = BTreeMap::new();

    for result in csv_reader.deserialize::<SignalRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;

        let initial = Phase::parse(&row.initial_phase).ok_or_else(|| {
            ScheduleError::Parse(format!(
                "signal {}: invalid initial_phase {:?}: expected \"go\", \"caution\", or \"stop\"",
                row.signal_id, row.initial_phase
            ))
        })?;
        let timing = SignalTiming {
            go_secs:      row.go_secs,
            caution_secs: row.caution_secs,
            stop_secs:    row.stop_secs,
        };
        let signal = TrafficSignal::with_phase(SignalId(row.signal_id), timing, initial)?;

        if by_id.insert(row.signal_id, signal).is_some() {
            return Err(ScheduleError::Parse(format!("duplicate signal_id {}", row.signal_id)));
        }
    }

    // Keys iterate in order, so the first key that differs from its position
    // names the lowest missing id.
    let mut signals = Vec::with_capacity(by_id.len());
    for (expected, (id, signal)) in by_id.into_iter().enumerate() {
        if id as usize != expected {
            return Err(ScheduleError::Parse(format!("missing signal_id {expected}")));
        }
        signals.push(signal);
    }
    Ok(signals)
}
