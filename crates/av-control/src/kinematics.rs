//! Stopping distance and speed smoothing.

use av_core::geo::is_nearly_zero;

/// Kinematic stopping distance `-(v²) / (2a)` for speed `speed` and braking
/// deceleration `deceleration` (negative).
///
/// Returns 0 when either input is nearly zero, and never a negative
/// distance.
pub fn braking_distance(speed: f32, deceleration: f32) -> f32 {
    if is_nearly_zero(deceleration) || is_nearly_zero(speed) {
        return 0.0;
    }
    let distance = -(speed * speed) / (2.0 * deceleration);
    if distance.is_nan() { 0.0 } else { distance.max(0.0) }
}

/// One smoothing step from `current` toward `target`.
///
/// `alpha = clamp(rate * dt, 0, 1)`; the result always lies between
/// `current` and `target` inclusive, so repeated steps approach the target
/// monotonically without overshoot.  An infinite product saturates like any
/// other large one; a NaN product leaves the speed unchanged.
pub fn smooth_speed(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let alpha = rate * dt;
    if alpha.is_nan() || alpha <= 0.0 {
        return current;
    }
    if alpha >= 1.0 {
        return target;
    }
    let next = current + (target - current) * alpha;
    next.clamp(current.min(target), current.max(target))
}
