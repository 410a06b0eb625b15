//! Unit tests for av-control.
//!
//! Scenes are either a real `World` behind a small adapter, or a scripted
//! caster that returns one fixed hit so the angular gate can be driven with
//! arbitrary geometry.

#[cfg(test)]
mod helpers {
    use std::collections::HashMap;

    use av_core::{AgentId, EntityId, SignalId, Vec3};
    use av_schedule::Phase;
    use av_spatial::{Aabb, Collider, PolylinePath, RayCaster, RayHit, World};

    use crate::{PeerSnapshot, Scene};

    /// A `World` plus the signal phases and peer speeds it refers to.
    #[derive(Default)]
    pub struct WorldScene {
        pub world:  World,
        pub phases: HashMap<SignalId, Phase>,
        pub peers:  HashMap<AgentId, PeerSnapshot>,
    }

    impl RayCaster for WorldScene {
        fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<EntityId>) -> Option<RayHit> {
            self.world.cast_ray(origin, end, ignore)
        }
    }

    impl Scene for WorldScene {
        fn signal_phase(&self, signal: SignalId) -> Option<Phase> {
            self.phases.get(&signal).copied()
        }
        fn peer(&self, agent: AgentId) -> Option<PeerSnapshot> {
            self.peers.get(&agent).copied()
        }
    }

    impl WorldScene {
        /// Signal 0 in `phase`, its box spanning x ∈ [400, 600] across the
        /// road.
        pub fn with_signal(phase: Phase) -> Self {
            let mut scene = Self::default();
            scene.world.insert_static(Collider::new(
                SignalId(0),
                Aabb::from_center(Vec3::new(500.0, 0.0, 0.0), Vec3::new(100.0, 100.0, 100.0)),
            ));
            scene.phases.insert(SignalId(0), phase);
            scene
        }

        /// A vehicle box centred at `center` (half extents 50 × 25 × 25).
        pub fn add_vehicle(&mut self, id: AgentId, center: Vec3, speed: Option<f32>) {
            let mut dynamic: Vec<Collider> = Vec::new();
            for (peer_id, peer) in &self.peers {
                dynamic.push(Collider::new(*peer_id, vehicle_box(peer.position)));
            }
            dynamic.push(Collider::new(id, vehicle_box(center)));
            self.world.set_dynamic(dynamic);
            self.peers.insert(id, PeerSnapshot { position: center, speed });
        }
    }

    fn vehicle_box(center: Vec3) -> Aabb {
        Aabb::from_center(center, Vec3::new(50.0, 25.0, 25.0))
    }

    /// Always reports the same hit, regardless of the ray.
    pub struct ScriptedScene {
        pub hit:   Option<RayHit>,
        pub phase: Option<Phase>,
        pub peer:  Option<PeerSnapshot>,
    }

    impl ScriptedScene {
        pub fn hitting(entity: impl Into<EntityId>, point: Vec3) -> Self {
            Self {
                hit:   Some(RayHit { point, entity: entity.into(), distance: point.norm() }),
                phase: None,
                peer:  None,
            }
        }
    }

    impl RayCaster for ScriptedScene {
        fn cast_ray(&self, _origin: Vec3, _end: Vec3, _ignore: Option<EntityId>) -> Option<RayHit> {
            self.hit
        }
    }

    impl Scene for ScriptedScene {
        fn signal_phase(&self, _signal: SignalId) -> Option<Phase> {
            self.phase
        }
        fn peer(&self, _agent: AgentId) -> Option<PeerSnapshot> {
            self.peer
        }
    }

    /// Straight path along +X from the origin, 10 000 units long.
    pub fn straight_path() -> PolylinePath {
        PolylinePath::straight(Vec3::zeros(), Vec3::new(10_000.0, 0.0, 0.0)).unwrap()
    }

    pub const ME: AgentId = AgentId(0);
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{ControlError, ControllerConfig, VehicleController};
    use super::helpers::ME;

    #[test]
    fn defaults_are_valid() {
        let cfg = ControllerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_speed, 1000.0);
        assert_eq!(cfg.max_braking_deceleration, -500.0);
        assert_eq!(cfg.panic_duration_secs, 10.0);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            ControllerConfig { max_speed: 0.0, ..Default::default() },
            ControllerConfig { max_braking_deceleration: 10.0, ..Default::default() },
            ControllerConfig { ahead_threshold: 1.5, ..Default::default() },
            ControllerConfig { lane_change_speed: -1.0, ..Default::default() },
            ControllerConfig { panic_duration_secs: 0.0, ..Default::default() },
            ControllerConfig { detection_distance: f32::INFINITY, ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(ControlError::Config(_))), "{cfg:?}");
        }
    }

    #[test]
    fn controller_construction_validates() {
        let cfg = ControllerConfig { transition_rate: f32::NAN, ..Default::default() };
        assert!(VehicleController::new(ME, cfg).is_err());
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod kinematics {
    use proptest::prelude::*;

    use crate::{braking_distance, smooth_speed};

    #[test]
    fn braking_distance_examples() {
        assert_eq!(braking_distance(0.0, -500.0), 0.0);
        assert_eq!(braking_distance(1000.0, 0.0), 0.0);
        assert!((braking_distance(1000.0, -500.0) - 1000.0).abs() < 1e-3);
        // A positive "deceleration" never yields a negative distance.
        assert_eq!(braking_distance(1000.0, 500.0), 0.0);
    }

    #[test]
    fn alpha_saturates_at_one() {
        assert_eq!(smooth_speed(0.0, 1000.0, 5.0, 0.5), 1000.0);
        assert_eq!(smooth_speed(400.0, 1000.0, 5.0, 0.0), 400.0);
        assert!((smooth_speed(0.0, 1000.0, 5.0, 0.1) - 500.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_alpha() {
        assert_eq!(smooth_speed(200.0, 1000.0, f32::INFINITY, 0.1), 1000.0);
        assert_eq!(smooth_speed(200.0, 1000.0, f32::NEG_INFINITY, 0.1), 200.0);
        assert_eq!(smooth_speed(200.0, 1000.0, f32::NAN, 0.1), 200.0);
        assert_eq!(smooth_speed(200.0, 1000.0, f32::INFINITY, 0.0), 200.0);
    }

    proptest! {
        #[test]
        fn braking_distance_is_non_negative(
            speed in 0.0f32..5_000.0,
            decel in -5_000.0f32..-0.001,
        ) {
            prop_assert!(braking_distance(speed, decel) >= 0.0);
        }

        #[test]
        fn smoothing_is_monotone_and_converges(
            start  in 0.0f32..2_000.0,
            target in 0.0f32..2_000.0,
            dt     in 0.001f32..0.2,
        ) {
            let rate = 5.0f32;
            let alpha = (rate * dt).min(1.0);
            let ticks = (20.0 / alpha).ceil() as usize;

            let mut speed = start;
            let mut gap = (target - start).abs();
            for _ in 0..ticks {
                let next = smooth_speed(speed, target, rate, dt);
                let next_gap = (target - next).abs();
                prop_assert!(next_gap <= gap, "gap grew: {gap} -> {next_gap}");
                // Never crosses the target.
                prop_assert!((next - target) * (start - target) >= 0.0);
                speed = next;
                gap = next_gap;
            }
            prop_assert!(gap < 0.05, "did not converge: {speed} vs {target}");
        }
    }
}

// ── Perception ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod perception {
    use av_core::{AgentId, BodyPose, ObstacleId, SignalId, Vec3};
    use av_schedule::Phase;

    use super::helpers::{ScriptedScene, WorldScene, ME};
    use crate::{is_ahead, sense, HitTarget, Perception, PeerSnapshot};

    fn pose() -> BodyPose {
        BodyPose::default()
    }

    #[test]
    fn angular_gate() {
        let p = Vec3::zeros();
        let f = Vec3::x();
        assert!(is_ahead(p, f, Vec3::new(100.0, 0.0, 0.0), 0.7));
        assert!(!is_ahead(p, f, Vec3::new(0.0, 100.0, 0.0), 0.7));
        assert!(!is_ahead(p, f, Vec3::new(-100.0, 0.0, 0.0), 0.7));
        // Strictly greater than the threshold.
        assert!(!is_ahead(p, f, Vec3::new(100.0, 0.0, 0.0), 1.0));
        // No direction to a hit at the body position.
        assert!(!is_ahead(p, f, p, 0.7));
    }

    #[test]
    fn clear_road() {
        let scene = WorldScene::default();
        assert_eq!(sense(&scene, ME, &pose(), 1000.0, 0.7), Perception::Clear);
    }

    #[test]
    fn signal_hit_carries_phase() {
        let scene = WorldScene::with_signal(Phase::Stop);
        let Perception::Hit(hit) = sense(&scene, ME, &pose(), 1000.0, 0.7) else {
            panic!("expected a hit");
        };
        assert!(hit.ahead);
        assert!((hit.distance - 400.0).abs() < 1e-3);
        assert_eq!(hit.target, HitTarget::Signal { id: SignalId(0), phase: Phase::Stop });
    }

    #[test]
    fn own_body_is_ignored() {
        let mut scene = WorldScene::with_signal(Phase::Go);
        scene.add_vehicle(ME, Vec3::zeros(), Some(0.0));
        let perception = sense(&scene, ME, &pose(), 1000.0, 0.7);
        let hit = perception.ahead().expect("signal ahead");
        assert!(matches!(hit.target, HitTarget::Signal { .. }));
    }

    #[test]
    fn hit_at_right_angle_is_not_ahead() {
        let scene = ScriptedScene::hitting(ObstacleId(3), Vec3::new(0.0, -200.0, 0.0));
        let perception = sense(&scene, ME, &pose(), 1000.0, 0.7);
        assert!(matches!(perception, Perception::Hit(h) if !h.ahead));
        assert!(perception.ahead().is_none());
    }

    #[test]
    fn unknown_signal_is_an_obstacle() {
        let scene = ScriptedScene::hitting(SignalId(9), Vec3::new(300.0, 0.0, 0.0));
        let hit = *sense(&scene, ME, &pose(), 1000.0, 0.7).ahead().unwrap();
        assert_eq!(hit.target, HitTarget::Obstacle);
    }

    #[test]
    fn peer_speed_is_read_from_snapshot() {
        let mut scene = ScriptedScene::hitting(AgentId(4), Vec3::new(100.0, 0.0, 0.0));
        scene.peer = Some(PeerSnapshot { position: Vec3::new(150.0, 0.0, 0.0), speed: Some(300.0) });
        let hit = *sense(&scene, ME, &pose(), 1000.0, 0.7).ahead().unwrap();
        assert_eq!(hit.target, HitTarget::Peer { id: AgentId(4), speed: Some(300.0) });

        scene.peer = None;
        let hit = *sense(&scene, ME, &pose(), 1000.0, 0.7).ahead().unwrap();
        assert_eq!(hit.target, HitTarget::Peer { id: AgentId(4), speed: None });
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decision {
    use av_core::{AgentId, SignalId, Vec3};
    use av_schedule::Phase;

    use crate::{decide, HitTarget, Perception, SensedHit};

    const MAX: f32 = 1000.0;
    const SAFE: f32 = 500.0;

    fn hit(target: HitTarget, distance: f32, ahead: bool) -> Perception {
        Perception::Hit(SensedHit {
            point: Vec3::new(distance, 0.0, 0.0),
            distance,
            ahead,
            target,
        })
    }

    fn signal(phase: Phase) -> Perception {
        hit(HitTarget::Signal { id: SignalId(0), phase }, 400.0, true)
    }

    #[test]
    fn clear_is_free_flow() {
        let d = decide(&Perception::Clear, false, 0.0, MAX, SAFE);
        assert_eq!(d.target_speed, MAX);
        assert_eq!(d.observed_phase, Some(Phase::Go));
        assert!(!d.held);
    }

    #[test]
    fn hit_outside_cone_is_free_flow() {
        let d = decide(&hit(HitTarget::Obstacle, 50.0, false), false, 0.0, MAX, SAFE);
        assert_eq!(d.target_speed, MAX);
        assert_eq!(d.observed_phase, Some(Phase::Go));
    }

    #[test]
    fn stop_signal_stops_unless_panicking() {
        let calm = decide(&signal(Phase::Stop), false, 800.0, MAX, SAFE);
        assert_eq!(calm.target_speed, 0.0);
        assert_eq!(calm.observed_phase, Some(Phase::Stop));
        assert!(calm.held);

        let panicked = decide(&signal(Phase::Stop), true, 800.0, MAX, SAFE);
        assert_eq!(panicked.target_speed, MAX);
        assert_eq!(panicked.observed_phase, Some(Phase::Go));
    }

    #[test]
    fn caution_stops_and_go_proceeds() {
        assert_eq!(decide(&signal(Phase::Caution), false, 0.0, MAX, SAFE).target_speed, 0.0);
        assert_eq!(decide(&signal(Phase::Go), false, 0.0, MAX, SAFE).target_speed, MAX);
    }

    #[test]
    fn close_leader_sets_speed_regardless_of_max() {
        let leader = hit(HitTarget::Peer { id: AgentId(1), speed: Some(300.0) }, 100.0, true);
        assert_eq!(decide(&leader, false, 900.0, MAX, SAFE).target_speed, 300.0);
        assert_eq!(decide(&leader, false, 900.0, 200.0, SAFE).target_speed, 300.0);
        // The cached signal phase is not touched by a leader.
        assert_eq!(decide(&leader, false, 900.0, MAX, SAFE).observed_phase, None);
    }

    #[test]
    fn silent_leader_decays_current_speed() {
        let leader = hit(HitTarget::Peer { id: AgentId(1), speed: None }, 100.0, true);
        let d = decide(&leader, false, 500.0, MAX, SAFE);
        assert!((d.target_speed - 400.0).abs() < 1e-3);
    }

    #[test]
    fn distant_leader_is_free_flow() {
        let leader = hit(HitTarget::Peer { id: AgentId(1), speed: Some(300.0) }, 500.0, true);
        assert_eq!(decide(&leader, false, 0.0, MAX, SAFE).target_speed, MAX);
    }

    #[test]
    fn obstacle_stops_without_touching_phase() {
        let d = decide(&hit(HitTarget::Obstacle, 300.0, true), true, 900.0, MAX, SAFE);
        assert_eq!(d.target_speed, 0.0);
        assert_eq!(d.observed_phase, None);
        assert!(d.held);
    }
}

// ── Steering ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod steering {
    use av_core::{BodyPose, Vec3};
    use av_spatial::PolylinePath;

    use super::helpers::straight_path;
    use crate::steer;

    #[test]
    fn aligned_on_path_is_straight() {
        let path = straight_path();
        let pose = BodyPose::from_yaw(Vec3::new(1000.0, 0.0, 0.0), 0.0);
        assert!(steer(&pose, Some(&path), 0.0, 500.0).abs() < 1e-6);
    }

    #[test]
    fn no_or_empty_path_is_straight() {
        let pose = BodyPose::from_yaw(Vec3::new(0.0, 300.0, 0.0), 0.0);
        assert_eq!(steer::<PolylinePath>(&pose, None, 0.0, 500.0), 0.0);

        let point = PolylinePath::new(vec![Vec3::zeros(), Vec3::zeros()]).unwrap();
        assert_eq!(steer(&pose, Some(&point), 0.0, 500.0), 0.0);
    }

    #[test]
    fn right_offset_steers_right() {
        let path = straight_path();
        let pose = BodyPose::from_yaw(Vec3::zeros(), 0.0);
        // Target at (500, -300): right of a +X heading.
        let s = steer(&pose, Some(&path), 300.0, 500.0);
        let expected = 300.0 / (500.0f32 * 500.0 + 300.0 * 300.0).sqrt();
        assert!((s - expected).abs() < 1e-5, "{s} vs {expected}");
    }

    #[test]
    fn left_of_path_steers_right_back_on() {
        let path = straight_path();
        // Body 200 units left (+Y) of the path, heading +X.
        let pose = BodyPose::from_yaw(Vec3::new(0.0, 200.0, 0.0), 0.0);
        assert!(steer(&pose, Some(&path), 0.0, 500.0) > 0.0);
        let pose = BodyPose::from_yaw(Vec3::new(0.0, -200.0, 0.0), 0.0);
        assert!(steer(&pose, Some(&path), 0.0, 500.0) < 0.0);
    }

    #[test]
    fn look_ahead_clamps_at_path_end() {
        let path = PolylinePath::straight(Vec3::zeros(), Vec3::new(1000.0, 0.0, 0.0)).unwrap();
        // Facing +Y past the end: the clamped target (1000, 0) is directly behind.
        let pose = BodyPose::from_yaw(Vec3::new(1000.0, 100.0, 0.0), std::f32::consts::FRAC_PI_2);
        let s = steer(&pose, Some(&path), 0.0, 500.0);
        assert!((-1.0..=1.0).contains(&s));
        assert!(s.abs() < 1e-5, "{s}");
    }
}

// ── Lane change ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane {
    use crate::{BehaviorMode, LaneState};

    #[test]
    fn idle_lane_is_normal() {
        let mut lane = LaneState::new(100.0);
        assert_eq!(lane.advance(0.1), (0.0, BehaviorMode::Normal));
    }

    #[test]
    fn reaches_target_exactly_in_any_decomposition() {
        let decompositions: [&[f32]; 7] = [
            &[0.5; 4],
            &[0.25; 8],
            &[0.1; 20],
            &[2.0],
            &[1.5, 0.5],
            &[0.4; 5],
            &[0.125; 16],
        ];
        for steps in decompositions {
            let mut lane = LaneState::new(100.0);
            lane.set_target(200.0);
            for (i, &dt) in steps.iter().enumerate() {
                let (offset, mode) = lane.advance(dt);
                if i + 1 < steps.len() {
                    assert_eq!(mode, BehaviorMode::LaneChanging, "{steps:?} step {i}");
                    assert!(offset < 200.0);
                } else {
                    assert_eq!(offset, 200.0, "{steps:?}");
                    assert_eq!(mode, BehaviorMode::Normal, "{steps:?}");
                }
            }
            assert_eq!(lane.advance(0.1), (200.0, BehaviorMode::Normal));
        }
    }

    #[test]
    fn equal_ticks_of_awkward_size_land_on_time() {
        for n in [3usize, 7, 13, 15, 60, 99, 100, 120, 150, 1000] {
            let dt = 2.0f32 / n as f32;
            let mut lane = LaneState::new(100.0);
            lane.set_target(200.0);
            for i in 0..n {
                let (offset, mode) = lane.advance(dt);
                if i + 1 < n {
                    assert_eq!(mode, BehaviorMode::LaneChanging, "n={n} step {i}");
                    assert!(offset < 200.0, "n={n} step {i}: {offset}");
                } else {
                    assert_eq!((offset, mode), (200.0, BehaviorMode::Normal), "n={n}");
                }
            }
        }
    }

    #[test]
    fn retarget_mid_change_starts_from_current_offset() {
        let mut lane = LaneState::new(100.0);
        lane.set_target(200.0);
        assert_eq!(lane.advance(0.5).0, 50.0);
        // Same target again keeps the progress made so far.
        lane.set_target(200.0);
        assert_eq!(lane.advance(0.5).0, 100.0);
        lane.set_target(0.0);
        assert_eq!(lane.advance(0.5), (50.0, BehaviorMode::LaneChanging));
        assert_eq!(lane.advance(0.5), (0.0, BehaviorMode::Normal));
    }

    #[test]
    fn moves_left_and_snaps() {
        let mut lane = LaneState::new(200.0);
        lane.set_target(-300.0);
        assert_eq!(lane.advance(1.0), (-200.0, BehaviorMode::LaneChanging));
        assert_eq!(lane.advance(1.0), (-300.0, BehaviorMode::Normal));
    }

    #[test]
    fn zero_rate_never_arrives() {
        let mut lane = LaneState::new(0.0);
        lane.set_target(100.0);
        for _ in 0..10 {
            assert_eq!(lane.advance(0.5), (0.0, BehaviorMode::LaneChanging));
        }
    }

    #[test]
    fn non_finite_target_ignored() {
        let mut lane = LaneState::new(100.0);
        lane.set_target(f32::NAN);
        assert_eq!(lane.target(), 0.0);
        assert!(!lane.is_changing());
    }
}

// ── Panic ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod panic {
    use av_core::SimTime;
    use av_schedule::{TimerKey, TimerQueue};

    use super::helpers::ME;
    use crate::{PanicOverride, PanicState};

    fn secs(s: f32) -> SimTime {
        SimTime::from_secs_f32(s)
    }

    /// Fire everything due at `now` into `panic`.
    fn fire(panic: &mut PanicOverride, timers: &mut TimerQueue, now: SimTime) {
        for (_, key) in timers.drain_due(now) {
            assert_eq!(key, TimerKey::PanicReset(ME));
            panic.expire();
        }
    }

    #[test]
    fn expires_after_duration() {
        let mut timers = TimerQueue::new();
        let mut panic = PanicOverride::new(10.0);
        assert_eq!(panic.trigger(ME, SimTime::ZERO, &mut timers), secs(10.0));
        assert!(panic.is_panicking());

        fire(&mut panic, &mut timers, secs(9.9));
        assert!(panic.is_panicking());
        fire(&mut panic, &mut timers, secs(10.0));
        assert_eq!(panic.state(), PanicState::Calm);
    }

    #[test]
    fn retrigger_restarts_window() {
        let mut timers = TimerQueue::new();
        let mut panic = PanicOverride::new(10.0);
        panic.trigger(ME, SimTime::ZERO, &mut timers);
        panic.trigger(ME, secs(5.0), &mut timers);
        assert_eq!(timers.len(), 1);

        fire(&mut panic, &mut timers, secs(10.0));
        assert!(panic.is_panicking(), "first window must not end the panic");
        fire(&mut panic, &mut timers, secs(14.95));
        assert!(panic.is_panicking());
        fire(&mut panic, &mut timers, secs(15.0));
        assert!(!panic.is_panicking());
    }
}

// ── VehicleController ─────────────────────────────────────────────────────────

#[cfg(test)]
mod controller {
    use av_core::{AgentId, BodyPose, SimTime, Vec3};
    use av_schedule::{Phase, TimerKey, TimerQueue};
    use av_spatial::PolylinePath;

    use super::helpers::{straight_path, WorldScene, ME};
    use crate::{BehaviorMode, ControllerConfig, VehicleController};

    const DT: f32 = 0.05;

    fn controller() -> VehicleController {
        VehicleController::new(ME, ControllerConfig::default()).unwrap()
    }

    #[test]
    fn free_road_accelerates_toward_max() {
        let mut ctrl = controller();
        let scene = WorldScene::default();
        let path = straight_path();
        let pose = BodyPose::default();

        let out = ctrl.tick(Some(&pose), Some(&path), &scene, DT);
        assert_eq!(out.target_speed, 1000.0);
        assert!((out.speed - 250.0).abs() < 1e-3);
        assert!(out.steer.abs() < 1e-6);
        assert_eq!(out.behavior, BehaviorMode::Normal);
        assert_eq!(ctrl.signal_phase(), Phase::Go);
    }

    #[test]
    fn red_signal_holds_until_panic() {
        let mut ctrl = VehicleController::with_speed(ME, ControllerConfig::default(), 800.0).unwrap();
        let scene = WorldScene::with_signal(Phase::Stop);
        let path = straight_path();
        let pose = BodyPose::default();
        let mut timers = TimerQueue::new();

        let out = ctrl.tick(Some(&pose), Some(&path), &scene, DT);
        assert_eq!(out.target_speed, 0.0);
        assert!(out.speed < 800.0);
        assert_eq!(out.behavior, BehaviorMode::Waiting);
        assert_eq!(ctrl.signal_phase(), Phase::Stop);

        ctrl.trigger_panic(SimTime::ZERO, &mut timers);
        assert_eq!(timers.deadline(TimerKey::PanicReset(ME)), Some(SimTime::from_secs_f32(10.0)));
        let out = ctrl.tick(Some(&pose), Some(&path), &scene, DT);
        assert_eq!(out.target_speed, 1000.0);
        assert_eq!(out.behavior, BehaviorMode::Normal);
        assert_eq!(ctrl.signal_phase(), Phase::Go);

        ctrl.on_panic_expired();
        assert!(!ctrl.is_panicking());
        assert_eq!(ctrl.tick(Some(&pose), Some(&path), &scene, DT).target_speed, 0.0);
    }

    #[test]
    fn follows_close_leader() {
        let mut ctrl = VehicleController::with_speed(ME, ControllerConfig::default(), 900.0).unwrap();
        let mut scene = WorldScene::default();
        scene.add_vehicle(ME, Vec3::zeros(), Some(900.0));
        // Leader rear bumper at x = 150.
        scene.add_vehicle(AgentId(1), Vec3::new(200.0, 0.0, 0.0), Some(300.0));

        let out = ctrl.tick(Some(&BodyPose::default()), None::<&PolylinePath>, &scene, DT);
        assert_eq!(out.target_speed, 300.0);
        assert_eq!(out.steer, 0.0);
    }

    #[test]
    fn no_body_fails_open() {
        let mut ctrl = controller();
        let scene = WorldScene::with_signal(Phase::Stop);
        let path = straight_path();
        let out = ctrl.tick(None, Some(&path), &scene, DT);
        assert_eq!(out.target_speed, 1000.0);
        assert_eq!(out.steer, 0.0);
    }

    #[test]
    fn lane_change_steers_then_settles() {
        let mut ctrl = controller();
        let scene = WorldScene::default();
        let path = straight_path();
        let pose = BodyPose::default();

        ctrl.set_target_lane_offset(300.0);
        let out = ctrl.tick(Some(&pose), Some(&path), &scene, 0.5);
        assert_eq!(out.lane_offset, 100.0);
        assert_eq!(out.behavior, BehaviorMode::LaneChanging);
        assert!(out.steer > 0.0);

        ctrl.tick(Some(&pose), Some(&path), &scene, 0.5);
        let out = ctrl.tick(Some(&pose), Some(&path), &scene, 0.5);
        assert_eq!(out.lane_offset, 300.0);
        assert_eq!(out.behavior, BehaviorMode::Normal);
    }

    #[test]
    fn side_probe() {
        let ctrl = controller();
        let mut scene = WorldScene::default();
        scene.add_vehicle(ME, Vec3::zeros(), Some(0.0));
        // Neighbour 250 units to the right (-Y), level with the probe start.
        scene.add_vehicle(AgentId(1), Vec3::new(100.0, -250.0, 0.0), None);
        let pose = BodyPose::default();

        assert!(!ctrl.is_side_clear(Some(&pose), &scene, true));
        assert!(ctrl.is_side_clear(Some(&pose), &scene, false));
        assert!(!ctrl.is_side_clear(None, &scene, false));
    }

    #[test]
    fn braking_distance_tracks_speed() {
        let ctrl = VehicleController::with_speed(ME, ControllerConfig::default(), 1000.0).unwrap();
        assert!((ctrl.braking_distance() - 1000.0).abs() < 1e-3);
        assert_eq!(controller().braking_distance(), 0.0);
    }
}
