//! A two-lane highway with one signal, a slow truck, and a stalled car on the
//! shoulder.
//!
//! Units are centimetres.  The road runs along +X; the right lane is the path
//! centreline and the left lane sits at lane offset −`LANE_WIDTH`.
//!
//! ```text
//!   y=+300  ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─   left lane
//!   y=0     car car car car  truck →            ┃ signal          right lane
//!   y=-350                                       ▭ stalled car    shoulder
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};

use av_control::ControllerConfig;
use av_core::{AgentId, SignalId, SimConfig, SimRng, Vec3};
use av_schedule::{Phase, SignalTiming, TrafficSignal};
use av_sim::{Sim, SimBuilder, VehicleBody, VehicleSpec};
use av_spatial::PolylinePath;

pub const LANE_WIDTH:   f32 = 300.0;
pub const ROAD_LENGTH:  f32 = 200_000.0;
pub const SIGNAL_X:     f32 = 40_000.0;
const CAR_GAP:          f32 = 1_200.0;
const TRUCK_HALF:       [f32; 3] = [600.0, 125.0, 150.0];

/// Everything the demo reads from its optional JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub sim:          SimConfig,
    pub controller:   ControllerConfig,
    pub signal:       SignalTiming,
    /// Commuter cars behind the truck.
    pub cars:         usize,
    pub truck_speed:  f32,
    /// Per-car top speed is drawn uniformly from `[min, controller.max_speed]`.
    pub min_car_speed: f32,
    /// Probability that a commuter keeps a doubled following distance.
    pub cautious_share: f64,
    pub output_dir:   String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig {
                total_ticks:           3_000, // 60 s at 50 Hz
                output_interval_ticks: 25,
                ..SimConfig::default()
            },
            controller:    ControllerConfig::default(),
            signal:        SignalTiming::default(),
            cars:          6,
            truck_speed:   450.0,
            min_car_speed: 800.0,
            cautious_share: 0.3,
            output_dir:    "output/highway".into(),
        }
    }
}

/// Ids the script needs to address.
pub struct Cast {
    pub truck:   AgentId,
    pub cars:    Vec<AgentId>,
    pub stalled: AgentId,
    pub signal:  SignalId,
}

pub fn build(cfg: &DemoConfig) -> Result<(Sim, Cast)> {
    let mut rng = SimRng::new(cfg.sim.seed);
    // Separate streams so changing the car count does not reshuffle gaps.
    let mut speeds = rng.fork(1);
    let mut gaps = rng.fork(2);
    let mut temperament = rng.fork(3);
    let mut b = SimBuilder::new(cfg.sim.clone());

    let road = b.add_path(PolylinePath::straight(
        Vec3::zeros(),
        Vec3::new(ROAD_LENGTH, 0.0, 0.0),
    )?);

    let signal = b.add_signal(
        TrafficSignal::with_phase(SignalId(0), cfg.signal, Phase::Go)?,
        Vec3::new(SIGNAL_X, LANE_WIDTH / 2.0, 0.0),
        Vec3::new(10.0, LANE_WIDTH * 1.5, 300.0),
    )?;

    // The truck leads in the right lane.
    let lead_x = CAR_GAP * (cfg.cars as f32 + 2.0);
    let mut truck_body = VehicleBody::new(Vec3::new(lead_x, 0.0, 0.0), 0.0);
    truck_body.half_extents = Vec3::from(TRUCK_HALF);
    let truck_cfg = ControllerConfig { max_speed: cfg.truck_speed, ..cfg.controller.clone() };
    let truck = b.add_vehicle(
        VehicleSpec::controlled(truck_body, Some(road), truck_cfg).with_speed(cfg.truck_speed),
    );

    // Commuters queue behind it with jittered gaps and top speeds; some
    // leave a wider gap to the car in front.
    let mut cars = Vec::with_capacity(cfg.cars);
    let mut x = lead_x - CAR_GAP * 1.5;
    let top = cfg.controller.max_speed.max(cfg.min_car_speed);
    for _ in 0..cfg.cars {
        let max_speed = speeds.uniform(cfg.min_car_speed, top);
        let mut car_cfg = ControllerConfig { max_speed, ..cfg.controller.clone() };
        if temperament.chance(cfg.cautious_share) {
            car_cfg.safe_following_distance *= 2.0;
        }
        let body = VehicleBody::new(Vec3::new(x, 0.0, 0.0), 0.0);
        cars.push(b.add_vehicle(
            VehicleSpec::controlled(body, Some(road), car_cfg).with_speed(cfg.truck_speed),
        ));
        x -= gaps.jitter(CAR_GAP, 0.25);
    }

    // A stalled car on the right shoulder, level with the middle of the queue.
    let stalled_x = lead_x - CAR_GAP * (cfg.cars as f32 / 2.0).ceil();
    let stalled = b.add_vehicle(VehicleSpec::parked(VehicleBody::new(
        Vec3::new(stalled_x, -(LANE_WIDTH + 50.0), 0.0),
        0.0,
    )));

    // Jersey barrier past the end of the road.
    b.add_obstacle(
        Vec3::new(ROAD_LENGTH + 100.0, 0.0, 0.0),
        Vec3::new(50.0, LANE_WIDTH * 3.0, 100.0),
    );

    Ok((b.build()?, Cast { truck, cars, stalled, signal }))
}
