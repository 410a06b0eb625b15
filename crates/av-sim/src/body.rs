//! Kinematic vehicle body: the actuation side of the control loop.
//!
//! The body does no dynamics.  Each step it moves along its heading at the
//! commanded speed (capped by `max_movement_speed`) and turns by an angle
//! proportional to the steering command.

use av_core::geo::is_nearly_zero;
use av_core::{BodyPose, Vec3};
use av_spatial::Aabb;

/// Default collision box: 4.5 m × 2 m × 1.5 m, in centimetres, as half extents.
pub const DEFAULT_HALF_EXTENTS: [f32; 3] = [225.0, 100.0, 75.0];

/// A kinematic vehicle body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleBody {
    pub position:               Vec3,
    /// Heading in radians, counter-clockwise from +X.
    pub yaw:                    f32,
    /// Speed at a normalised throttle of 1.
    pub max_movement_speed:     f32,
    /// Wheel angle at a steering command of ±1, in degrees.
    pub max_steering_angle_deg: f32,
    /// Yaw rate multiplier applied to the wheel angle.
    pub steering_rate:          f32,
    /// Half length / half width / half height of the collision box.
    pub half_extents:           Vec3,
}

impl VehicleBody {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            max_movement_speed:     1000.0,
            max_steering_angle_deg: 45.0,
            steering_rate:          50.0,
            half_extents:           Vec3::from(DEFAULT_HALF_EXTENTS),
        }
    }

    #[inline]
    pub fn pose(&self) -> BodyPose {
        BodyPose::from_yaw(self.position, self.yaw)
    }

    /// World-space collision box for the current pose.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_oriented(self.position, self.pose().forward, self.half_extents)
    }

    /// Move for `dt` seconds at `speed` (units/s), then turn by `steer`.
    ///
    /// Speed is normalised against `max_movement_speed` and clamped to
    /// `[0, 1]`; the body cannot reverse.  Positive steer turns right
    /// (clockwise seen from above).
    pub fn apply(&mut self, speed: f32, steer: f32, dt: f32) {
        if self.max_movement_speed > 0.0 {
            let normalized = (speed / self.max_movement_speed).clamp(0.0, 1.0);
            if !normalized.is_nan() && !is_nearly_zero(normalized) {
                let forward = self.pose().forward;
                self.position += forward * (normalized * self.max_movement_speed * dt);
            }
        }

        let steer = steer.clamp(-1.0, 1.0);
        if !steer.is_nan() && !is_nearly_zero(steer) {
            let degrees = steer * self.max_steering_angle_deg * dt * self.steering_rate;
            self.yaw = wrap_angle(self.yaw - degrees.to_radians());
        }
    }
}

/// Wrap to `(-π, π]`.
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}
