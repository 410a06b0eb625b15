//! Ray-cast world: colliders in an R-tree plus a segment query.
//!
//! # Data layout
//!
//! Colliders are axis-aligned boxes tagged with the [`EntityId`] they belong
//! to.  They live in two `rstar` trees:
//!
//! - **static**: signals and obstacles, inserted once at scene build time.
//! - **dynamic**: vehicle bodies, bulk-loaded again after every actuation
//!   step (`World::set_dynamic`).  Bulk loading N boxes is O(N log N) and
//!   produces a better-packed tree than incremental inserts.
//!
//! # Query
//!
//! `cast_ray` uses the segment's bounding box as the broad phase
//! (`locate_in_envelope_intersecting`) and a slab test as the narrow phase,
//! returning the nearest hit that is not the ignored entity.

use rstar::{AABB, RTree, RTreeObject};

use av_core::geo::right_of;
use av_core::{EntityId, Vec3};

/// Directions shorter than this are treated as parallel to a slab.
const PARALLEL_EPS: f32 = 1.0e-12;

// ── RayCaster ─────────────────────────────────────────────────────────────────

/// The nearest blocking hit along a ray segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,
    /// What was hit.
    pub entity: EntityId,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Black-box spatial query used by perception and the side-clearance probe.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: with the `parallel` feature of
/// `av-sim` every vehicle's perception runs against one shared world.
pub trait RayCaster: Send + Sync {
    /// Cast a segment from `origin` to `end`.  Colliders belonging to
    /// `ignore` are skipped (a vehicle never senses itself).
    fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<EntityId>) -> Option<RayHit>;
}

// ── Aabb ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box from two arbitrary corners.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self { min: a.inf(&b), max: a.sup(&b) }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self { min: center - half, max: center + half }
    }

    /// Tightest axis-aligned box around a box of the given half length /
    /// half width / half height rotated to face `forward` in the ground plane.
    pub fn from_oriented(center: Vec3, forward: Vec3, half_extents: Vec3) -> Self {
        let right = right_of(forward);
        let ex = forward.x.abs() * half_extents.x + right.x.abs() * half_extents.y;
        let ey = forward.y.abs() * half_extents.x + right.y.abs() * half_extents.y;
        Self::from_center(center, Vec3::new(ex, ey, half_extents.z))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test against the segment `origin + t * delta`, `t ∈ [0, 1]`.
    ///
    /// Returns the entry parameter; `Some(0.0)` when `origin` is inside.
    pub fn segment_entry(&self, origin: Vec3, delta: Vec3) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;
        for axis in 0..3 {
            let o = origin[axis];
            let d = delta[axis];
            if d.abs() < PARALLEL_EPS {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    fn envelope(&self) -> AABB<[f32; 3]> {
        AABB::from_corners(to_array(self.min), to_array(self.max))
    }
}

#[inline]
fn to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

// ── Collider ──────────────────────────────────────────────────────────────────

/// A box that blocks sensing rays, owned by one entity.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    pub entity: EntityId,
    pub bounds: Aabb,
}

impl Collider {
    pub fn new(entity: impl Into<EntityId>, bounds: Aabb) -> Self {
        Self { entity: entity.into(), bounds }
    }
}

impl RTreeObject for Collider {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds.envelope()
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Reference [`RayCaster`]: static and dynamic colliders in two R-trees.
pub struct World {
    static_tree:  RTree<Collider>,
    dynamic_tree: RTree<Collider>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            static_tree:  RTree::new(),
            dynamic_tree: RTree::new(),
        }
    }

    /// Build a world whose static layer is `colliders`.
    pub fn with_static(colliders: Vec<Collider>) -> Self {
        Self {
            static_tree:  RTree::bulk_load(colliders),
            dynamic_tree: RTree::new(),
        }
    }

    /// Add one static collider (signal housing, barrier, …).
    pub fn insert_static(&mut self, collider: Collider) {
        self.static_tree.insert(collider);
    }

    /// Replace the whole dynamic layer.  Called once per step with the
    /// vehicles' post-actuation boxes.
    pub fn set_dynamic(&mut self, colliders: Vec<Collider>) {
        self.dynamic_tree = RTree::bulk_load(colliders);
    }

    pub fn static_count(&self) -> usize {
        self.static_tree.size()
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic_tree.size()
    }
}

impl RayCaster for World {
    fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<EntityId>) -> Option<RayHit> {
        let delta = end - origin;
        let length = delta.norm();
        if length <= 0.0 || !length.is_finite() {
            return None;
        }

        let query = AABB::from_corners(to_array(origin), to_array(end));
        let candidates = self
            .static_tree
            .locate_in_envelope_intersecting(&query)
            .chain(self.dynamic_tree.locate_in_envelope_intersecting(&query));

        let mut best: Option<(f32, EntityId)> = None;
        for collider in candidates {
            if Some(collider.entity) == ignore {
                continue;
            }
            if let Some(t) = collider.bounds.segment_entry(origin, delta) {
                let closer = match best {
                    None          => true,
                    Some((bt, be)) => t < bt || (t == bt && collider.entity < be),
                };
                if closer {
                    best = Some((t, collider.entity));
                }
            }
        }

        best.map(|(t, entity)| RayHit {
            point:    origin + delta * t,
            entity,
            distance: length * t,
        })
    }
}
