//! World-space vector type and pose helpers.
//!
//! Coordinates are right-handed with +Z up.  Units are whatever the scene
//! uses; the default tuning assumes centimetres (1000 units/s top speed,
//! 300-unit lane width).
//!
//! `Vec3` is single-precision.  At city scale in centimetres this keeps
//! sub-millimetre precision within a few kilometres of the origin.

/// A world-space position or direction.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Tolerance used by [`is_nearly_zero`] and [`safe_normal`].
pub const SMALL_NUMBER: f32 = 1.0e-8;

/// `true` if `value` is within [`SMALL_NUMBER`] of zero.
#[inline]
pub fn is_nearly_zero(value: f32) -> bool {
    value.abs() <= SMALL_NUMBER
}

/// World up axis.
#[inline]
pub fn up() -> Vec3 {
    Vec3::z()
}

/// Normalise `v`, returning the zero vector instead of NaNs when `v` is
/// (nearly) zero length.
#[inline]
pub fn safe_normal(v: Vec3) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq <= SMALL_NUMBER {
        Vec3::zeros()
    } else {
        v / len_sq.sqrt()
    }
}

/// Right-hand direction for a heading, i.e. `forward × up`.
#[inline]
pub fn right_of(forward: Vec3) -> Vec3 {
    safe_normal(forward.cross(&up()))
}

// ── BodyPose ──────────────────────────────────────────────────────────────────

/// Position and orientation of a controlled body, as published by the
/// actuation collaborator each tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyPose {
    pub position: Vec3,
    /// Unit heading.
    pub forward: Vec3,
    /// Unit right-hand direction, perpendicular to `forward` in the ground plane.
    pub right: Vec3,
}

impl BodyPose {
    /// Build a pose from a ground-plane heading angle in radians
    /// (0 = +X, counter-clockwise positive).
    pub fn from_yaw(position: Vec3, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let forward = Vec3::new(cos, sin, 0.0);
        Self { position, forward, right: right_of(forward) }
    }

    /// `position + forward * distance`.
    #[inline]
    pub fn ahead(&self, distance: f32) -> Vec3 {
        self.position + self.forward * distance
    }
}

impl Default for BodyPose {
    fn default() -> Self {
        Self::from_yaw(Vec3::zeros(), 0.0)
    }
}
