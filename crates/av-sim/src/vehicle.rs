//! Simulation-side records for vehicles and signals.

use av_control::{BehaviorMode, ControlOutput, ControllerConfig, PeerSnapshot, VehicleController};
use av_core::{AgentId, PathId, Vec3};
use av_schedule::TrafficSignal;
use av_spatial::Aabb;

use crate::VehicleBody;

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// One vehicle in the simulation: a body plus an optional controller.
///
/// Vehicles without a controller are parked: they occupy the world and are
/// visible to other vehicles' sensors but never move and publish no speed.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id:         AgentId,
    pub body:       VehicleBody,
    pub controller: Option<VehicleController>,
    pub path:       Option<PathId>,
}

impl Vehicle {
    #[inline]
    pub fn is_controlled(&self) -> bool {
        self.controller.is_some()
    }

    /// Current speed; 0 for parked vehicles.
    pub fn speed(&self) -> f32 {
        self.controller.as_ref().map_or(0.0, |c| c.speed())
    }

    /// Last control output, or a stationary one for parked vehicles.
    pub fn output(&self) -> ControlOutput {
        match &self.controller {
            Some(c) => c.output(),
            None => ControlOutput {
                speed:        0.0,
                target_speed: 0.0,
                steer:        0.0,
                lane_offset:  0.0,
                behavior:     BehaviorMode::Normal,
            },
        }
    }

    pub fn is_panicking(&self) -> bool {
        self.controller.as_ref().is_some_and(|c| c.is_panicking())
    }

    /// What other vehicles see of this one.
    pub fn snapshot(&self) -> PeerSnapshot {
        PeerSnapshot {
            position: self.body.position,
            speed:    self.controller.as_ref().map(|c| c.speed()),
        }
    }
}

/// How to spawn a vehicle.
#[derive(Clone, Debug)]
pub struct VehicleSpec {
    pub body:          VehicleBody,
    pub path:          Option<PathId>,
    /// `None` spawns a parked vehicle.
    pub control:       Option<ControllerConfig>,
    pub initial_speed: f32,
    /// Lateral offset the controller starts converging to.
    pub lane_offset:   f32,
}

impl VehicleSpec {
    /// A controlled vehicle following `path`.
    pub fn controlled(body: VehicleBody, path: Option<PathId>, config: ControllerConfig) -> Self {
        Self { body, path, control: Some(config), initial_speed: 0.0, lane_offset: 0.0 }
    }

    /// A vehicle with no controller.
    pub fn parked(body: VehicleBody) -> Self {
        Self { body, path: None, control: None, initial_speed: 0.0, lane_offset: 0.0 }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.initial_speed = speed;
        self
    }

    pub fn with_lane_offset(mut self, offset: f32) -> Self {
        self.lane_offset = offset;
        self
    }
}

// ── SignalSite ────────────────────────────────────────────────────────────────

/// A traffic signal and the box that blocks sensing rays at its stop line.
#[derive(Clone, Debug)]
pub struct SignalSite {
    pub signal:       TrafficSignal,
    pub position:     Vec3,
    pub half_extents: Vec3,
}

impl SignalSite {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }
}
