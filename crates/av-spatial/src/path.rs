//! Reference-path geometry.
//!
//! The controller only needs a handful of arc-length queries, so the path is
//! consumed through [`ReferencePath`].  [`PolylinePath`] is a piecewise-linear
//! implementation good enough for road centrelines sampled every few metres.
//!
//! # Parameterisation
//!
//! A polyline parameter is `segment_index + fraction`, so parameter `2.25`
//! sits a quarter of the way along the third segment.  Arc length at a
//! parameter comes from a prefix sum of segment lengths.

use av_core::Vec3;
use av_core::geo::{right_of, safe_normal};

use crate::{SpatialError, SpatialResult};

/// Arc-length oracle used by path following.
pub trait ReferencePath: Send + Sync {
    /// Total arc length.
    fn total_length(&self) -> f32;

    /// Parameter of the path point closest to `point`.
    fn closest_parameter(&self, point: Vec3) -> f32;

    /// Arc length from the start of the path to `param`.
    fn distance_at_parameter(&self, param: f32) -> f32;

    /// World point at arc length `distance` (clamped to the path).
    fn point_at_distance(&self, distance: f32) -> Vec3;

    /// Unit right-hand lateral direction at arc length `distance`.
    fn lateral_direction_at_distance(&self, distance: f32) -> Vec3;
}

// ── PolylinePath ──────────────────────────────────────────────────────────────

/// Piecewise-linear reference path.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolylinePath {
    points:     Vec<Vec3>,
    /// `cumulative[i]` = arc length at `points[i]`.
    cumulative: Vec<f32>,
}

impl PolylinePath {
    /// Build a path through `points`.
    ///
    /// # Errors
    ///
    /// `DegeneratePath` with fewer than two points, `NonFinitePoint` for any
    /// NaN or infinite coordinate.  Repeated points are allowed and produce
    /// zero-length segments.
    pub fn new(points: Vec<Vec3>) -> SpatialResult<Self> {
        if points.len() < 2 {
            return Err(SpatialError::DegeneratePath(points.len()));
        }
        if let Some(i) = points.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(SpatialError::NonFinitePoint(i));
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0f32;
        cumulative.push(acc);
        for w in points.windows(2) {
            acc += (w[1] - w[0]).norm();
            cumulative.push(acc);
        }
        Ok(Self { points, cumulative })
    }

    /// Straight two-point path.
    pub fn straight(start: Vec3, end: Vec3) -> SpatialResult<Self> {
        Self::new(vec![start, end])
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Index of the segment containing arc length `distance` (already clamped).
    fn segment_at(&self, distance: f32) -> usize {
        // First cumulative entry strictly greater than `distance`, minus one.
        let upper = self.cumulative.partition_point(|&c| c <= distance);
        upper.saturating_sub(1).min(self.segment_count() - 1)
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return 0.0;
        }
        distance.clamp(0.0, self.total_length())
    }

    /// Unit tangent of segment `seg`; zero-length segments fall back to the
    /// overall start→end direction.
    fn tangent(&self, seg: usize) -> Vec3 {
        let dir = safe_normal(self.points[seg + 1] - self.points[seg]);
        if dir != Vec3::zeros() {
            return dir;
        }
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        safe_normal(last - first)
    }
}

impl ReferencePath for PolylinePath {
    fn total_length(&self) -> f32 {
        self.cumulative[self.cumulative.len() - 1]
    }

    fn closest_parameter(&self, point: Vec3) -> f32 {
        let mut best_param = 0.0f32;
        let mut best_dist_sq = f32::INFINITY;
        for (i, w) in self.points.windows(2).enumerate() {
            let seg = w[1] - w[0];
            let len_sq = seg.norm_squared();
            let frac = if len_sq > 0.0 {
                ((point - w[0]).dot(&seg) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist_sq = (w[0] + seg * frac - point).norm_squared();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best_param = i as f32 + frac;
            }
        }
        best_param
    }

    fn distance_at_parameter(&self, param: f32) -> f32 {
        if param.is_nan() || param <= 0.0 {
            return 0.0;
        }
        let max_param = self.segment_count() as f32;
        if param >= max_param {
            return self.total_length();
        }
        let seg = param.floor() as usize;
        let frac = param - seg as f32;
        let start = self.cumulative[seg];
        start + (self.cumulative[seg + 1] - start) * frac
    }

    fn point_at_distance(&self, distance: f32) -> Vec3 {
        let d = self.clamp_distance(distance);
        let seg = self.segment_at(d);
        let start = self.cumulative[seg];
        let len = self.cumulative[seg + 1] - start;
        if len <= 0.0 {
            return self.points[seg];
        }
        let frac = ((d - start) / len).clamp(0.0, 1.0);
        self.points[seg] + (self.points[seg + 1] - self.points[seg]) * frac
    }

    fn lateral_direction_at_distance(&self, distance: f32) -> Vec3 {
        let d = self.clamp_distance(distance);
        right_of(self.tangent(self.segment_at(d)))
    }
}
