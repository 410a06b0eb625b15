//! Per-vehicle controller tuning.

use crate::{ControlError, ControlResult};

/// Tuning knobs for one [`VehicleController`][crate::VehicleController].
///
/// Distances are in scene units (centimetres by default), speeds in units
/// per second, times in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Length of the forward sensing ray.
    pub detection_distance: f32,

    /// A hit counts as "ahead" when `dot(forward, to_hit) > ahead_threshold`.
    /// 1.0 = dead ahead, 0.0 = abeam, -1.0 = behind.
    pub ahead_threshold: f32,

    /// Free-flow target speed.
    pub max_speed: f32,

    /// Braking capability, stored negative.  Only feeds the advisory
    /// braking-distance query.
    pub max_braking_deceleration: f32,

    /// Speed smoothing rate; `alpha = clamp(rate * dt, 0, 1)` per tick.
    pub transition_rate: f32,

    /// How far along the path ahead of the closest point to steer at.
    pub look_ahead_distance: f32,

    /// Lateral offset change rate during lane changes.
    pub lane_change_speed: f32,

    /// Leaders closer than this set the target speed.
    pub safe_following_distance: f32,

    /// Length of the lateral side-clearance probe (about one lane width).
    pub side_probe_distance: f32,

    /// How far ahead of the body the side probe starts.
    pub side_probe_forward_offset: f32,

    /// Panic override lifetime after the most recent trigger.
    pub panic_duration_secs: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            detection_distance:        1000.0,
            ahead_threshold:           0.7,
            max_speed:                 1000.0,
            max_braking_deceleration: -500.0,
            transition_rate:           5.0,
            look_ahead_distance:       500.0,
            lane_change_speed:         200.0,
            safe_following_distance:   500.0,
            side_probe_distance:       300.0,
            side_probe_forward_offset: 100.0,
            panic_duration_secs:       10.0,
        }
    }
}

impl ControllerConfig {
    /// Reject values the per-tick maths cannot work with.
    pub fn validate(&self) -> ControlResult<()> {
        let fields = [
            ("detection_distance",        self.detection_distance),
            ("ahead_threshold",           self.ahead_threshold),
            ("max_speed",                 self.max_speed),
            ("max_braking_deceleration",  self.max_braking_deceleration),
            ("transition_rate",           self.transition_rate),
            ("look_ahead_distance",       self.look_ahead_distance),
            ("lane_change_speed",         self.lane_change_speed),
            ("safe_following_distance",   self.safe_following_distance),
            ("side_probe_distance",       self.side_probe_distance),
            ("side_probe_forward_offset", self.side_probe_forward_offset),
            ("panic_duration_secs",       self.panic_duration_secs),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ControlError::Config(format!("{name} must be finite, got {value}")));
            }
        }

        if self.max_speed <= 0.0 {
            return Err(ControlError::Config(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if self.max_braking_deceleration > 0.0 {
            return Err(ControlError::Config(format!(
                "max_braking_deceleration is stored negative, got {}",
                self.max_braking_deceleration
            )));
        }
        if !(-1.0..=1.0).contains(&self.ahead_threshold) {
            return Err(ControlError::Config(format!(
                "ahead_threshold must lie in [-1, 1], got {}",
                self.ahead_threshold
            )));
        }
        if self.panic_duration_secs <= 0.0 {
            return Err(ControlError::Config(format!(
                "panic_duration_secs must be positive, got {}",
                self.panic_duration_secs
            )));
        }

        let non_negative = [
            ("detection_distance",        self.detection_distance),
            ("transition_rate",           self.transition_rate),
            ("look_ahead_distance",       self.look_ahead_distance),
            ("lane_change_speed",         self.lane_change_speed),
            ("safe_following_distance",   self.safe_following_distance),
            ("side_probe_distance",       self.side_probe_distance),
            ("side_probe_forward_offset", self.side_probe_forward_offset),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ControlError::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}
