//! Plain data row types written by output backends.

use av_control::BehaviorMode;
use av_schedule::Phase;

/// One vehicle's pose and control state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleRow {
    pub tick:         u64,
    pub time_secs:    f64,
    pub vehicle_id:   u32,
    /// `false` for parked vehicles; their control columns are all zero.
    pub controlled:   bool,
    pub x:            f32,
    pub y:            f32,
    pub yaw:          f32,
    pub speed:        f32,
    pub target_speed: f32,
    pub steer:        f32,
    pub lane_offset:  f32,
    pub behavior:     BehaviorMode,
    pub panicking:    bool,
}

/// One signal's phase at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub tick:      u64,
    pub time_secs: f64,
    pub signal_id: u32,
    pub phase:     Phase,
}

/// Per-step counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:                u64,
    pub controlled_vehicles: u64,
}
