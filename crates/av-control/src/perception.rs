//! Forward sensing: one ray, an angular gate, and hit classification.
//!
//! The ray runs from the body position along its heading for
//! `detection_distance`, ignoring the querying vehicle.  A hit is "ahead"
//! when the unit vector from the body to the impact point has a dot product
//! with the heading strictly greater than the threshold.  A hit exactly at
//! the body position has no direction and is never ahead.

use av_core::geo::safe_normal;
use av_core::{AgentId, BodyPose, EntityId, SignalId, Vec3};
use av_schedule::Phase;

use crate::Scene;

/// What the forward ray struck.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HitTarget {
    /// A traffic signal and the phase it showed this step.
    Signal { id: SignalId, phase: Phase },
    /// Another vehicle.  `speed` is `None` when it publishes none.
    Peer { id: AgentId, speed: Option<f32> },
    /// Anything else that blocks the road.
    Obstacle,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensedHit {
    pub point:    Vec3,
    /// Euclidean distance from the body position to `point`.
    pub distance: f32,
    /// Passed the angular gate.
    pub ahead:    bool,
    pub target:   HitTarget,
}

/// Result of one forward query.  Lives for a single tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Perception {
    Clear,
    Hit(SensedHit),
}

impl Perception {
    /// The hit, if there is one and it passed the angular gate.
    pub fn ahead(&self) -> Option<&SensedHit> {
        match self {
            Perception::Hit(hit) if hit.ahead => Some(hit),
            _ => None,
        }
    }
}

/// `dot(forward, normalize(point - position)) > threshold`.
#[inline]
pub fn is_ahead(position: Vec3, forward: Vec3, point: Vec3, threshold: f32) -> bool {
    forward.dot(&safe_normal(point - position)) > threshold
}

/// Cast the forward ray for vehicle `me` and classify the result.
pub fn sense<S: Scene + ?Sized>(
    scene:              &S,
    me:                 AgentId,
    pose:               &BodyPose,
    detection_distance: f32,
    ahead_threshold:    f32,
) -> Perception {
    let end = pose.ahead(detection_distance);
    let Some(hit) = scene.cast_ray(pose.position, end, Some(EntityId::Vehicle(me))) else {
        return Perception::Clear;
    };

    let target = match hit.entity {
        EntityId::Signal(id) => match scene.signal_phase(id) {
            Some(phase) => HitTarget::Signal { id, phase },
            None        => HitTarget::Obstacle,
        },
        EntityId::Vehicle(id) => HitTarget::Peer {
            id,
            speed: scene.peer(id).and_then(|p| p.speed),
        },
        EntityId::Obstacle(_) => HitTarget::Obstacle,
    };

    Perception::Hit(SensedHit {
        point:    hit.point,
        distance: (hit.point - pose.position).norm(),
        ahead:    is_ahead(pose.position, pose.forward, hit.point, ahead_threshold),
        target,
    })
}
