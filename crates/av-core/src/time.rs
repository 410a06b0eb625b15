//! Simulation time model.
//!
//! # Design
//!
//! Two clocks run side by side:
//!
//! - `Tick` counts fixed simulation steps (used for output intervals and run
//!   length).
//! - `SimTime` is the simulated instant in whole **microseconds**.  Timer
//!   deadlines (panic expiry, signal phase switches) are expressed in
//!   `SimTime`, so "exactly 10 seconds after the trigger" is an integer
//!   comparison with no floating-point drift across thousands of steps.
//!
//! Per-tick control maths still uses an `f32` `dt` in seconds; `SimClock`
//! converts the configured step length once.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Whether this step is a snapshot step for the given interval.
    /// An interval of 0 never matches.
    #[inline]
    pub fn is_every(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimTime ───────────────────────────────────────────────────────────────────

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// A simulated instant, in microseconds since the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Convert a duration in seconds to whole microseconds (rounded to
    /// nearest, negative and non-finite inputs clamp to zero).
    #[inline]
    pub fn from_secs_f32(secs: f32) -> SimTime {
        SimTime(secs_to_micros(secs))
    }

    /// The instant `secs` seconds after `self`.
    #[inline]
    pub fn after_secs(self, secs: f32) -> SimTime {
        SimTime(self.0.saturating_add(secs_to_micros(secs)))
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        (self.0 as f64 / MICROS_PER_SEC) as f32
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_SEC
    }
}

fn secs_to_micros(secs: f32) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs as f64 * MICROS_PER_SEC).round() as u64
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and simulated instant for a fixed-step run.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Step length in seconds as handed to the controllers.
    pub tick_secs: f32,
    /// Step length in whole microseconds (what `now` advances by).
    pub tick_micros: u64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0 with the given step length.
    pub fn new(tick_secs: f32) -> Self {
        Self {
            tick_secs,
            tick_micros: secs_to_micros(tick_secs),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// The simulated instant at the start of the current tick.
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime(self.current_tick.0 * self.tick_micros)
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if self.tick_micros == 0 {
            return 0;
        }
        secs_to_micros(secs).div_ceil(self.tick_micros)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.now())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seconds per step.  Must be positive and finite.  Default: 0.02 (50 Hz).
    pub tick_secs: f32,

    /// Total steps to simulate.
    pub total_ticks: u64,

    /// Master RNG seed for scenario generation.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_secs)
    }

    /// Reject step lengths that would stall or corrupt the clock.
    pub fn validate(&self) -> crate::AvResult<()> {
        if !self.tick_secs.is_finite() || self.tick_secs <= 0.0 {
            return Err(crate::AvError::Config(format!(
                "tick_secs must be positive and finite, got {}",
                self.tick_secs
            )));
        }
        if secs_to_micros(self.tick_secs) == 0 {
            return Err(crate::AvError::Config(format!(
                "tick_secs {} is below the 1 µs clock resolution",
                self.tick_secs
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_secs:             0.02,
            total_ticks:           3_000,
            seed:                  42,
            num_threads:           None,
            output_interval_ticks: 1,
        }
    }
}
