//! Per-step read-only view handed to every controller.

use av_control::{PeerSnapshot, Scene};
use av_core::{AgentId, EntityId, SignalId, Vec3};
use av_schedule::Phase;
use av_spatial::{RayCaster, RayHit, World};

/// Snapshot of the world at the start of a step.
///
/// Built once per step before any controller runs and shared immutably, so
/// serial and parallel control phases see identical inputs.
pub struct SimScene<'a> {
    pub world:  &'a World,
    /// Signal phases indexed by `SignalId`.
    pub phases: &'a [Phase],
    /// Vehicle states indexed by `AgentId`.
    pub peers:  &'a [PeerSnapshot],
}

impl<'a> SimScene<'a> {
    #[inline]
    pub fn new(world: &'a World, phases: &'a [Phase], peers: &'a [PeerSnapshot]) -> Self {
        Self { world, phases, peers }
    }
}

impl RayCaster for SimScene<'_> {
    #[inline]
    fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<EntityId>) -> Option<RayHit> {
        self.world.cast_ray(origin, end, ignore)
    }
}

impl Scene for SimScene<'_> {
    fn signal_phase(&self, signal: SignalId) -> Option<Phase> {
        self.phases.get(signal.index()).copied()
    }

    fn peer(&self, agent: AgentId) -> Option<PeerSnapshot> {
        self.peers.get(agent.index()).copied()
    }
}
