//! Traffic-signal phase cycling.
//!
//! A [`TrafficSignal`] owns its phase and one pending `SignalSwitch` timer in
//! the shared [`TimerQueue`].  The cycle is
//!
//! ```text
//! Go ──go_secs──▶ Caution ──caution_secs──▶ Stop ──stop_secs──▶ Go …
//! ```
//!
//! Force-setting a phase cancels the pending switch and schedules the next
//! one from the *new* phase's duration.

use std::fmt;

use tracing::debug;

use av_core::{SignalId, SimTime};

use crate::timer_queue::{TimerKey, TimerQueue};
use crate::{ScheduleError, ScheduleResult};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Observable signal state.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Stop,
    Caution,
    #[default]
    Go,
}

impl Phase {
    /// The phase that follows `self` in the fixed cycle.
    #[inline]
    pub fn next(self) -> Phase {
        match self {
            Phase::Go      => Phase::Caution,
            Phase::Caution => Phase::Stop,
            Phase::Stop    => Phase::Go,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Stop    => "stop",
            Phase::Caution => "caution",
            Phase::Go      => "go",
        }
    }

    /// Case-insensitive parse of `go`, `caution`, `stop`.  The colour names
    /// `green`, `yellow`, `red` are accepted as aliases.
    pub fn parse(s: &str) -> Option<Phase> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "green"       => Some(Phase::Go),
            "caution" | "yellow" => Some(Phase::Caution),
            "stop" | "red"       => Some(Phase::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SignalTiming ──────────────────────────────────────────────────────────────

/// Per-phase durations in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalTiming {
    pub go_secs:      f32,
    pub caution_secs: f32,
    pub stop_secs:    f32,
}

impl SignalTiming {
    /// How long the signal stays in `phase`.
    pub fn duration(&self, phase: Phase) -> f32 {
        match phase {
            Phase::Go      => self.go_secs,
            Phase::Caution => self.caution_secs,
            Phase::Stop    => self.stop_secs,
        }
    }

    /// Every duration must be positive and finite.
    pub fn validate(&self) -> ScheduleResult<()> {
        for phase in [Phase::Go, Phase::Caution, Phase::Stop] {
            let secs = self.duration(phase);
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ScheduleError::InvalidTiming(format!(
                    "{phase} duration must be positive and finite, got {secs}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self { go_secs: 10.0, caution_secs: 3.0, stop_secs: 8.0 }
    }
}

// ── TrafficSignal ─────────────────────────────────────────────────────────────

/// A three-phase signal driven by its own timer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficSignal {
    id:     SignalId,
    phase:  Phase,
    timing: SignalTiming,
}

impl TrafficSignal {
    /// A signal starting in `Go`.
    pub fn new(id: SignalId, timing: SignalTiming) -> ScheduleResult<Self> {
        Self::with_phase(id, timing, Phase::Go)
    }

    /// A signal starting in `initial`.
    pub fn with_phase(id: SignalId, timing: SignalTiming, initial: Phase) -> ScheduleResult<Self> {
        timing.validate()?;
        Ok(Self { id, phase: initial, timing })
    }

    #[inline]
    pub fn id(&self) -> SignalId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn timing(&self) -> &SignalTiming {
        &self.timing
    }

    fn key(&self) -> TimerKey {
        TimerKey::SignalSwitch(self.id)
    }

    /// Schedule the first switch, `duration(current phase)` after `now`.
    pub fn start(&self, now: SimTime, timers: &mut TimerQueue) {
        timers.schedule(self.key(), now.after_secs(self.timing.duration(self.phase)));
    }

    /// The pending switch fired: advance one phase and schedule the next.
    pub fn on_timer(&mut self, now: SimTime, timers: &mut TimerQueue) {
        let from = self.phase;
        self.phase = from.next();
        debug!(signal = %self.id, %from, to = %self.phase, "signal phase switch");
        self.start(now, timers);
    }

    /// Force the signal into `phase`.  The pending switch is replaced by one
    /// `duration(phase)` after `now`.
    pub fn set_phase(&mut self, phase: Phase, now: SimTime, timers: &mut TimerQueue) {
        debug!(signal = %self.id, from = %self.phase, to = %phase, "signal phase override");
        self.phase = phase;
        self.start(now, timers);
    }
}
