//! `VehicleController`: the per-vehicle perception → decision → control loop.
//!
//! # Tick order
//!
//! ```text
//! perception::sense        forward ray + angular gate + classification
//! decision::decide         target speed, cached signal phase
//! kinematics::smooth_speed current speed toward target
//! LaneState::advance       lateral offset toward target, behavior mode
//! steering::steer          look-ahead steering using this tick's offset
//! ```
//!
//! The order is fixed: steering must see the offset produced in the same
//! tick, and the target speed must come from this tick's perception.
//!
//! # Ownership
//!
//! All mutable state lives in the controller.  Peers and signals are read
//! through the [`Scene`] snapshot; timers go through the caller's
//! [`TimerQueue`], so the controller never holds a reference to anything it
//! does not own.

use tracing::{debug, trace};

use av_core::{AgentId, BodyPose, EntityId, SimTime};
use av_schedule::{Phase, TimerQueue};
use av_spatial::ReferencePath;

use crate::decision::decide;
use crate::kinematics::{braking_distance, smooth_speed};
use crate::lane::{BehaviorMode, LaneState};
use crate::panic::{PanicOverride, PanicState};
use crate::perception::{sense, Perception};
use crate::steering::steer;
use crate::{ControlResult, ControllerConfig, Scene};

/// Values handed to the actuation collaborator after a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlOutput {
    pub speed:        f32,
    pub target_speed: f32,
    /// In `[-1, 1]`; positive turns right.
    pub steer:        f32,
    pub lane_offset:  f32,
    pub behavior:     BehaviorMode,
}

/// Decision-and-control state for one vehicle.
#[derive(Clone, Debug)]
pub struct VehicleController {
    id:           AgentId,
    config:       ControllerConfig,
    speed:        f32,
    target_speed: f32,
    steer:        f32,
    lane:         LaneState,
    panic:        PanicOverride,
    behavior:     BehaviorMode,
    /// Last signal phase that influenced a decision (`Go` when unconstrained).
    signal_phase: Phase,
}

impl VehicleController {
    /// A stationary controller with zero lane offset.
    ///
    /// # Errors
    ///
    /// `ControlError::Config` if `config` fails validation.
    pub fn new(id: AgentId, config: ControllerConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            id,
            speed:        0.0,
            target_speed: 0.0,
            steer:        0.0,
            lane:         LaneState::new(config.lane_change_speed),
            panic:        PanicOverride::new(config.panic_duration_secs),
            behavior:     BehaviorMode::Normal,
            signal_phase: Phase::Go,
            config,
        })
    }

    /// Like [`new`][Self::new] with an initial speed (vehicles spawned
    /// already moving).
    pub fn with_speed(id: AgentId, config: ControllerConfig, speed: f32) -> ControlResult<Self> {
        let mut ctrl = Self::new(id, config)?;
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        ctrl.speed = speed;
        ctrl.target_speed = speed;
        Ok(ctrl)
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Run one control step.
    ///
    /// `pose` is `None` when no body is attached: perception then reports a
    /// clear road and steering is 0.  `path` may be absent as well.
    pub fn tick<S, P>(
        &mut self,
        pose:  Option<&BodyPose>,
        path:  Option<&P>,
        scene: &S,
        dt:    f32,
    ) -> ControlOutput
    where
        S: Scene + ?Sized,
        P: ReferencePath + ?Sized,
    {
        let perception = match pose {
            Some(pose) => sense(
                scene,
                self.id,
                pose,
                self.config.detection_distance,
                self.config.ahead_threshold,
            ),
            None => Perception::Clear,
        };

        let decision = decide(
            &perception,
            self.panic.is_panicking(),
            self.speed,
            self.config.max_speed,
            self.config.safe_following_distance,
        );
        self.target_speed = decision.target_speed;
        if let Some(phase) = decision.observed_phase {
            self.signal_phase = phase;
        }

        self.speed = smooth_speed(self.speed, self.target_speed, self.config.transition_rate, dt);

        let was_changing = self.lane.is_changing();
        let (lane_offset, lane_mode) = self.lane.advance(dt);
        if was_changing && lane_mode == BehaviorMode::Normal {
            debug!(agent = %self.id, offset = lane_offset, "lane change complete");
        }
        self.behavior = if lane_mode == BehaviorMode::Normal && decision.held {
            BehaviorMode::Waiting
        } else {
            lane_mode
        };

        self.steer = match pose {
            Some(pose) => steer(pose, path, lane_offset, self.config.look_ahead_distance),
            None => 0.0,
        };

        trace!(
            agent = %self.id,
            ?perception,
            target_speed = self.target_speed,
            speed = self.speed,
            steer = self.steer,
            lane_offset,
            "control tick"
        );

        self.output()
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Enter panic mode (e.g. on weapon fire nearby).  Signals are ignored
    /// until `panic_duration_secs` after the most recent trigger.
    pub fn trigger_panic(&mut self, now: SimTime, timers: &mut TimerQueue) {
        let was = self.panic.state();
        let until = self.panic.trigger(self.id, now, timers);
        debug!(agent = %self.id, %now, %until, restarted = was == PanicState::Panicking, "panic triggered");
    }

    /// The `PanicReset` timer for this vehicle fired.
    pub fn on_panic_expired(&mut self) {
        self.panic.expire();
        debug!(agent = %self.id, "panic expired");
    }

    /// Set the lateral offset to converge to.  Not gated; see
    /// [`is_side_clear`][Self::is_side_clear].
    pub fn set_target_lane_offset(&mut self, offset: f32) {
        if offset != self.lane.target() {
            debug!(agent = %self.id, from = self.lane.current(), to = offset, "lane change requested");
        }
        self.lane.set_target(offset);
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Lateral clearance probe: a ray of `side_probe_distance` starting
    /// `side_probe_forward_offset` ahead of the body, pointing right (or
    /// left), ignoring this vehicle.  `true` iff nothing is hit.
    ///
    /// Without a body there is nothing to probe from, and the answer is
    /// `false`.
    pub fn is_side_clear<S: Scene + ?Sized>(
        &self,
        pose:        Option<&BodyPose>,
        scene:       &S,
        check_right: bool,
    ) -> bool {
        let Some(pose) = pose else {
            return false;
        };
        let side = if check_right { pose.right } else { -pose.right };
        let start = pose.ahead(self.config.side_probe_forward_offset);
        let end = start + side * self.config.side_probe_distance;
        scene.cast_ray(start, end, Some(EntityId::Vehicle(self.id))).is_none()
    }

    /// Advisory stopping distance at the current speed.
    pub fn braking_distance(&self) -> f32 {
        braking_distance(self.speed, self.config.max_braking_deceleration)
    }

    pub fn output(&self) -> ControlOutput {
        ControlOutput {
            speed:        self.speed,
            target_speed: self.target_speed,
            steer:        self.steer,
            lane_offset:  self.lane.current(),
            behavior:     self.behavior,
        }
    }

    #[inline] pub fn id(&self) -> AgentId { self.id }
    #[inline] pub fn config(&self) -> &ControllerConfig { &self.config }
    #[inline] pub fn speed(&self) -> f32 { self.speed }
    #[inline] pub fn target_speed(&self) -> f32 { self.target_speed }
    #[inline] pub fn steer_value(&self) -> f32 { self.steer }
    #[inline] pub fn lane_offset(&self) -> f32 { self.lane.current() }
    #[inline] pub fn target_lane_offset(&self) -> f32 { self.lane.target() }
    #[inline] pub fn behavior(&self) -> BehaviorMode { self.behavior }
    #[inline] pub fn is_panicking(&self) -> bool { self.panic.is_panicking() }
    #[inline] pub fn signal_phase(&self) -> Phase { self.signal_phase }
}
