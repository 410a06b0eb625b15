//! Path following toward an offset look-ahead point.

use av_core::geo::safe_normal;
use av_core::BodyPose;
use av_spatial::ReferencePath;

/// Steering command in `[-1, 1]` (negative = left, positive = right).
///
/// The target is the path point `look_ahead` past the point closest to the
/// body (clamped to the path end), shifted `lane_offset` along the path's
/// right-hand direction.  The command is the dot product of the unit
/// direction to that target with the body's right vector.
///
/// Returns 0 without a path or with a zero-length one.
pub fn steer<P: ReferencePath + ?Sized>(
    pose:        &BodyPose,
    path:        Option<&P>,
    lane_offset: f32,
    look_ahead:  f32,
) -> f32 {
    let Some(path) = path else {
        return 0.0;
    };
    let length = path.total_length();
    if length <= 0.0 || !length.is_finite() {
        return 0.0;
    }

    let param = path.closest_parameter(pose.position);
    let distance = (path.distance_at_parameter(param) + look_ahead).min(length);

    let target = path.point_at_distance(distance)
        + path.lateral_direction_at_distance(distance) * lane_offset;
    let direction = safe_normal(target - pose.position);

    let value = direction.dot(&pose.right);
    if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) }
}
