//! Timed panic override.
//!
//! ```text
//!            trigger                   trigger (restarts window)
//!   Calm ─────────────▶ Panicking ◀──────────────┐
//!    ▲                      │ └──────────────────┘
//!    └──────────────────────┘
//!        PanicReset timer fires
//! ```
//!
//! The expiry lives in the shared `TimerQueue` under
//! `TimerKey::PanicReset(agent)`.  Scheduling replaces any pending expiry, so
//! the window always ends `duration` after the *latest* trigger.

use av_core::{AgentId, SimTime};
use av_schedule::{TimerKey, TimerQueue};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanicState {
    #[default]
    Calm,
    Panicking,
}

#[derive(Clone, Debug)]
pub struct PanicOverride {
    state:         PanicState,
    duration_secs: f32,
}

impl PanicOverride {
    pub fn new(duration_secs: f32) -> Self {
        Self { state: PanicState::Calm, duration_secs }
    }

    #[inline]
    pub fn state(&self) -> PanicState {
        self.state
    }

    #[inline]
    pub fn is_panicking(&self) -> bool {
        self.state == PanicState::Panicking
    }

    /// Enter (or stay in) `Panicking` and restart the expiry window.
    /// Returns the new expiry instant.
    pub fn trigger(&mut self, agent: AgentId, now: SimTime, timers: &mut TimerQueue) -> SimTime {
        self.state = PanicState::Panicking;
        let until = now.after_secs(self.duration_secs);
        timers.schedule(TimerKey::PanicReset(agent), until);
        until
    }

    /// The expiry timer fired.
    pub fn expire(&mut self) {
        self.state = PanicState::Calm;
    }
}
