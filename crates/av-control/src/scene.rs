//! Read-only view of the world handed to a controller each tick.

use av_core::{AgentId, SignalId, Vec3};
use av_schedule::Phase;
use av_spatial::RayCaster;

/// What a controller may learn about another vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerSnapshot {
    pub position: Vec3,
    /// Current speed, when the peer is controlled.  Parked or manually
    /// driven vehicles publish `None`.
    pub speed:    Option<f32>,
}

/// Everything perception needs beyond the ray cast itself.
///
/// A `Scene` is a snapshot: it must answer consistently for the whole step,
/// so every controller sees the same peer speeds and signal phases no matter
/// the order (or thread) in which controllers run.
///
/// # Example
///
/// ```rust,ignore
/// struct Empty;
///
/// impl RayCaster for Empty {
///     fn cast_ray(&self, _: Vec3, _: Vec3, _: Option<EntityId>) -> Option<RayHit> { None }
/// }
///
/// impl Scene for Empty {
///     fn signal_phase(&self, _: SignalId) -> Option<Phase> { None }
///     fn peer(&self, _: AgentId) -> Option<PeerSnapshot> { None }
/// }
/// ```
pub trait Scene: RayCaster {
    /// Current phase of `signal`, or `None` if the id is unknown.
    fn signal_phase(&self, signal: SignalId) -> Option<Phase>;

    /// Published state of vehicle `agent`, or `None` if the id is unknown.
    fn peer(&self, agent: AgentId) -> Option<PeerSnapshot>;
}
