//! The `Sim` struct and its step loop.

use tracing::{debug, warn};

use av_control::PeerSnapshot;
use av_core::{AgentId, SignalId, SimClock, SimConfig, SimTime, Tick};
use av_schedule::{Phase, TimerKey, TimerQueue};
use av_spatial::{Collider, ReferencePath, World};

use crate::{SignalSite, SimError, SimObserver, SimResult, SimScene, Vehicle};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each step runs, in order:
///
/// 1. **Timers**: drain due `PanicReset` / `SignalSwitch` deadlines and hand
///    them to their owners.
/// 2. **Snapshot**: collect signal phases and every vehicle's position and
///    speed into a [`SimScene`].
/// 3. **Control** (optionally parallel with the `parallel` feature): tick
///    every controller against the snapshot.
/// 4. **Actuation**: move and turn every controlled body.
/// 5. **World**: rebuild the dynamic collider layer from the new poses.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, step length, seed, …).
    pub config: SimConfig,

    /// Simulation clock: current tick and instant.
    pub clock: SimClock,

    /// Vehicles indexed by `AgentId`.
    pub(crate) vehicles: Vec<Vehicle>,

    /// Signals indexed by `SignalId`.
    pub(crate) signals: Vec<SignalSite>,

    /// Reference paths indexed by `PathId`.
    pub(crate) paths: Vec<Box<dyn ReferencePath>>,

    /// Static signal/obstacle boxes plus this step's vehicle boxes.
    pub(crate) world: World,

    /// Pending panic expiries and signal switches.
    pub(crate) timers: TimerQueue,
}

impl Sim {
    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run one step and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick;
        let now = self.clock.now();
        let dt = self.clock.tick_secs;

        observer.on_tick_start(tick);

        self.fire_timers(now);
        let controlled = self.control_phase(dt);
        self.actuate(dt);
        self.rebuild_dynamic();

        observer.on_tick_end(tick, controlled);
        if tick.is_every(self.config.output_interval_ticks) {
            observer.on_snapshot(tick, now, &self.vehicles, &self.signals);
        }

        self.clock.advance();
        Ok(())
    }

    // ── Step phases ───────────────────────────────────────────────────────

    fn fire_timers(&mut self, now: SimTime) {
        for (at, key) in self.timers.drain_due(now) {
            match key {
                TimerKey::PanicReset(agent) => {
                    match self.vehicles.get_mut(agent.index()).and_then(|v| v.controller.as_mut()) {
                        Some(ctrl) => ctrl.on_panic_expired(),
                        None => warn!(%agent, "panic expiry for unknown or uncontrolled vehicle"),
                    }
                }
                TimerKey::SignalSwitch(signal) => match self.signals.get_mut(signal.index()) {
                    // Reschedule from the deadline so the cycle does not drift
                    // when phase lengths are not a multiple of the step.
                    Some(site) => site.signal.on_timer(at, &mut self.timers),
                    None => warn!(%signal, "phase switch for unknown signal"),
                },
            }
        }
    }

    /// Tick every controller against one shared snapshot.  Returns the number
    /// of controllers that ran.
    fn control_phase(&mut self, dt: f32) -> usize {
        let phases = self.phases();
        let peers = self.peers();
        let scene = SimScene::new(&self.world, &phases, &peers);
        let paths = &self.paths;

        let run = |vehicle: &mut Vehicle| -> bool {
            let Some(ctrl) = vehicle.controller.as_mut() else {
                return false;
            };
            let pose = vehicle.body.pose();
            let path: Option<&dyn ReferencePath> =
                vehicle.path.and_then(|p| paths.get(p.index())).map(|b| &**b);
            ctrl.tick(Some(&pose), path, &scene, dt);
            true
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.vehicles.iter_mut().map(run).filter(|&ran| ran).count()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.vehicles.par_iter_mut().map(run).filter(|&ran| ran).count()
        }
    }

    fn actuate(&mut self, dt: f32) {
        for vehicle in &mut self.vehicles {
            if let Some(ctrl) = &vehicle.controller {
                vehicle.body.apply(ctrl.speed(), ctrl.steer_value(), dt);
            }
        }
    }

    pub(crate) fn rebuild_dynamic(&mut self) {
        let colliders = self
            .vehicles
            .iter()
            .map(|v| Collider::new(v.id, v.body.bounds()))
            .collect();
        self.world.set_dynamic(colliders);
    }

    fn phases(&self) -> Vec<Phase> {
        self.signals.iter().map(|s| s.signal.phase()).collect()
    }

    fn peers(&self) -> Vec<PeerSnapshot> {
        self.vehicles.iter().map(Vehicle::snapshot).collect()
    }

    // ── Read API ──────────────────────────────────────────────────────────

    /// The instant the next step will start at.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn signals(&self) -> &[SignalSite] {
        &self.signals
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn vehicle(&self, agent: AgentId) -> SimResult<&Vehicle> {
        self.vehicles.get(agent.index()).ok_or(SimError::UnknownAgent(agent))
    }

    pub fn signal_phase(&self, signal: SignalId) -> SimResult<Phase> {
        self.signals
            .get(signal.index())
            .map(|s| s.signal.phase())
            .ok_or(SimError::UnknownSignal(signal))
    }

    /// Side-clearance probe for `agent` against the current world.
    pub fn is_side_clear(&self, agent: AgentId, check_right: bool) -> SimResult<bool> {
        let vehicle = self.vehicle(agent)?;
        let ctrl = vehicle.controller.as_ref().ok_or(SimError::Uncontrolled(agent))?;
        let phases = self.phases();
        let peers = self.peers();
        let scene = SimScene::new(&self.world, &phases, &peers);
        Ok(ctrl.is_side_clear(Some(&vehicle.body.pose()), &scene, check_right))
    }

    // ── Write API ─────────────────────────────────────────────────────────

    /// Put `agent` into panic mode for the configured duration from now.
    pub fn trigger_panic(&mut self, agent: AgentId) -> SimResult<()> {
        let now = self.clock.now();
        let ctrl = self
            .vehicles
            .get_mut(agent.index())
            .ok_or(SimError::UnknownAgent(agent))?
            .controller
            .as_mut()
            .ok_or(SimError::Uncontrolled(agent))?;
        ctrl.trigger_panic(now, &mut self.timers);
        Ok(())
    }

    /// Force `signal` into `phase`; its next switch is rescheduled from now.
    pub fn set_signal_phase(&mut self, signal: SignalId, phase: Phase) -> SimResult<()> {
        let now = self.clock.now();
        let site = self
            .signals
            .get_mut(signal.index())
            .ok_or(SimError::UnknownSignal(signal))?;
        site.signal.set_phase(phase, now, &mut self.timers);
        Ok(())
    }

    /// Set the lateral offset `agent` converges to.  Not gated.
    pub fn set_target_lane_offset(&mut self, agent: AgentId, offset: f32) -> SimResult<()> {
        self.controller_mut(agent)?.set_target_lane_offset(offset);
        Ok(())
    }

    /// Shift `agent`'s target offset by `offset_delta` if the side it moves
    /// toward is clear (positive = right).  Returns whether the change was
    /// accepted.
    pub fn request_lane_change(&mut self, agent: AgentId, offset_delta: f32) -> SimResult<bool> {
        let check_right = offset_delta > 0.0;
        if !self.is_side_clear(agent, check_right)? {
            debug!(%agent, offset_delta, "lane change refused: side blocked");
            return Ok(false);
        }
        let ctrl = self.controller_mut(agent)?;
        let target = ctrl.target_lane_offset() + offset_delta;
        ctrl.set_target_lane_offset(target);
        Ok(true)
    }

    fn controller_mut(&mut self, agent: AgentId) -> SimResult<&mut av_control::VehicleController> {
        self.vehicles
            .get_mut(agent.index())
            .ok_or(SimError::UnknownAgent(agent))?
            .controller
            .as_mut()
            .ok_or(SimError::Uncontrolled(agent))
    }
}
