//! highway: end-to-end demo of the rust_av vehicle controller.
//!
//! A queue of cars follows a slow truck down a two-lane road toward a signal.
//! A scripted timeline exercises the command API: cars pull out to overtake
//! (refused while the stalled car blocks the shoulder side), one driver
//! panics and runs the light, and the signal is forced red late in the run.
//!
//! ```text
//! cargo run -p highway --release [-- config.json]
//! RUST_LOG=av_control=debug cargo run -p highway
//! ```

mod scenario;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use av_core::AgentId;
use av_output::{CsvWriter, TelemetryObserver};
use av_schedule::Phase;
use av_sim::{Sim, SimObserver};

use scenario::{Cast, DemoConfig, LANE_WIDTH};

// ── Script ────────────────────────────────────────────────────────────────────

enum Command {
    /// Positive = right.
    ChangeLane(AgentId, f32),
    Panic(AgentId),
    ForcePhase(Phase),
}

/// `(seconds, command)` pairs, in time order.
fn timeline(cast: &Cast) -> Vec<(f32, Command)> {
    let mut script = Vec::new();
    if let Some(&first) = cast.cars.first() {
        script.push((2.0, Command::ChangeLane(first, -LANE_WIDTH)));
        // Back into the right lane once clear of the truck.
        script.push((20.0, Command::ChangeLane(first, LANE_WIDTH)));
    }
    for (i, &car) in cast.cars.iter().enumerate().skip(1) {
        // A right-hand move with the stalled car alongside is refused for
        // cars level with it.
        let delta = if i % 2 == 0 { LANE_WIDTH } else { -LANE_WIDTH };
        script.push((4.0 + i as f32, Command::ChangeLane(car, delta)));
    }
    if let Some(&last) = cast.cars.last() {
        script.push((25.0, Command::Panic(last)));
    }
    script.push((45.0, Command::ForcePhase(Phase::Stop)));
    script.sort_by(|a, b| a.0.total_cmp(&b.0));
    script
}

fn apply(sim: &mut Sim, cast: &Cast, command: &Command) -> Result<()> {
    match *command {
        Command::ChangeLane(car, delta) => {
            let accepted = sim.request_lane_change(car, delta)?;
            if accepted {
                info!(%car, delta, "lane change accepted");
            } else {
                info!(%car, delta, "lane change refused");
            }
        }
        Command::Panic(car) => {
            sim.trigger_panic(car)?;
            warn!(%car, "driver panicking");
        }
        Command::ForcePhase(phase) => {
            sim.set_signal_phase(cast.signal, phase)?;
            info!(signal = %cast.signal, phase = phase.as_str(), "signal forced");
        }
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Config: defaults, or a JSON file given as the first argument.
    let cfg = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            serde_json::from_reader::<_, DemoConfig>(BufReader::new(file))
                .with_context(|| format!("parsing {path}"))?
        }
        None => DemoConfig::default(),
    };

    if let Some(n) = cfg.sim.num_threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    // 2. Build.
    let (mut sim, cast) = scenario::build(&cfg)?;
    info!(
        vehicles = sim.vehicles().len(),
        ticks = cfg.sim.total_ticks,
        tick_secs = cfg.sim.tick_secs,
        "scenario ready"
    );

    // 3. Output.
    std::fs::create_dir_all(&cfg.output_dir)?;
    let mut obs = TelemetryObserver::new(CsvWriter::new(Path::new(&cfg.output_dir))?);

    // 4. Run, applying scripted commands as their time comes up.
    let mut script = timeline(&cast).into_iter().peekable();
    let end = cfg.sim.end_tick();
    let t0 = Instant::now();
    while sim.current_tick() < end {
        let now = sim.now().as_secs_f32();
        while let Some((_, command)) = script.next_if(|(at, _)| *at <= now) {
            apply(&mut sim, &cast, &command)?;
        }
        sim.step(&mut obs)?;
    }
    obs.on_sim_end(sim.current_tick());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!("Simulated {} in {:.3} s wall clock", sim.now(), elapsed.as_secs_f64());
    println!("Telemetry written to {}", cfg.output_dir);
    println!(
        "Signal {} is {}; stalled car is vehicle {}",
        cast.signal,
        sim.signal_phase(cast.signal)?.as_str(),
        cast.stalled
    );
    println!();
    println!(
        "{:<8} {:>10} {:>8} {:>8} {:>14} {:>6}",
        "Vehicle", "x", "y", "speed", "behavior", "panic"
    );
    println!("{}", "-".repeat(60));
    for v in sim.vehicles() {
        let label = if v.id == cast.truck { format!("{} (T)", v.id) } else { v.id.to_string() };
        println!(
            "{:<8} {:>10.0} {:>8.0} {:>8.0} {:>14} {:>6}",
            label,
            v.body.position.x,
            v.body.position.y,
            v.speed(),
            v.output().behavior.as_str(),
            if v.is_panicking() { "yes" } else { "no" },
        );
    }

    Ok(())
}
