//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use av_control::VehicleController;
use av_core::{AgentId, ObstacleId, PathId, SignalId, SimConfig, SimTime, Vec3};
use av_schedule::{TimerQueue, TrafficSignal};
use av_spatial::{Aabb, Collider, ReferencePath, World};

use crate::{SignalSite, Sim, SimError, SimResult, Vehicle, VehicleSpec};

/// Fluent builder for [`Sim`].
///
/// Ids are handed out densely in insertion order, so the value returned by
/// each `add_*` call is also the entity's index in the built `Sim`.
///
/// # Example
///
/// ```rust,ignore
/// let mut b = SimBuilder::new(SimConfig::default());
/// let road = b.add_path(PolylinePath::straight(start, end));
/// b.add_signal(TrafficSignal::new(SignalId(0), SignalTiming::default())?, stop_line, half)?;
/// let car = b.add_vehicle(VehicleSpec::controlled(body, Some(road), ControllerConfig::default()));
/// let mut sim = b.build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    paths:     Vec<Box<dyn ReferencePath>>,
    signals:   Vec<SignalSite>,
    obstacles: Vec<Aabb>,
    vehicles:  Vec<VehicleSpec>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            paths:     Vec::new(),
            signals:   Vec::new(),
            obstacles: Vec::new(),
            vehicles:  Vec::new(),
        }
    }

    /// Register a reference path vehicles can follow.
    pub fn add_path(&mut self, path: impl ReferencePath + 'static) -> PathId {
        let id = PathId(self.paths.len() as u32);
        self.paths.push(Box::new(path));
        id
    }

    /// Place a signal whose stop-line box is centred at `position`.
    ///
    /// The signal's id must equal the number of signals already added.
    pub fn add_signal(
        &mut self,
        signal:       TrafficSignal,
        position:     Vec3,
        half_extents: Vec3,
    ) -> SimResult<SignalId> {
        let expected = SignalId(self.signals.len() as u32);
        if signal.id() != expected {
            return Err(SimError::Config(format!(
                "signal {} added out of order (expected {expected})",
                signal.id()
            )));
        }
        self.signals.push(SignalSite { signal, position, half_extents });
        Ok(expected)
    }

    /// Number of signals added so far; the next signal's id must equal it.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Place a static box that blocks sensing rays but has no behavior.
    pub fn add_obstacle(&mut self, center: Vec3, half_extents: Vec3) -> ObstacleId {
        let id = ObstacleId(self.obstacles.len() as u32);
        self.obstacles.push(Aabb::from_center(center, half_extents));
        id
    }

    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> AgentId {
        let id = AgentId(self.vehicles.len() as u32);
        self.vehicles.push(spec);
        id
    }

    /// Validate inputs, build controllers and the static world, start every
    /// signal's phase timer, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        // ── Vehicles ──────────────────────────────────────────────────────
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for (i, spec) in self.vehicles.into_iter().enumerate() {
            let id = AgentId(i as u32);
            if let Some(path) = spec.path.filter(|p| p.index() >= self.paths.len()) {
                return Err(SimError::UnknownPath(path));
            }
            let controller = match spec.control {
                Some(cfg) => {
                    let mut ctrl = VehicleController::with_speed(id, cfg, spec.initial_speed)?;
                    ctrl.set_target_lane_offset(spec.lane_offset);
                    Some(ctrl)
                }
                None => None,
            };
            vehicles.push(Vehicle { id, body: spec.body, controller, path: spec.path });
        }

        // ── Static world ──────────────────────────────────────────────────
        let statics = self
            .signals
            .iter()
            .map(|s| Collider::new(s.signal.id(), s.bounds()))
            .chain(
                self.obstacles
                    .iter()
                    .enumerate()
                    .map(|(i, b)| Collider::new(ObstacleId(i as u32), *b)),
            )
            .collect();
        let world = World::with_static(statics);

        // ── Timers ────────────────────────────────────────────────────────
        let mut timers = TimerQueue::new();
        let mut signals = self.signals;
        for site in &mut signals {
            site.signal.start(SimTime::ZERO, &mut timers);
        }

        info!(
            vehicles = vehicles.len(),
            signals = signals.len(),
            obstacles = self.obstacles.len(),
            paths = self.paths.len(),
            "simulation built"
        );

        let mut sim = Sim {
            clock: self.config.make_clock(),
            config: self.config,
            vehicles,
            signals,
            paths: self.paths,
            world,
            timers,
        };
        sim.rebuild_dynamic();
        Ok(sim)
    }
}
