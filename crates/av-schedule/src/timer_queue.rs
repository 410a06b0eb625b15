//! `TimerQueue`: deadline-ordered one-shot timers keyed by owner.
//!
//! # Model
//!
//! Panic expiry and signal phase switches are deferred callbacks.  Instead of
//! handing closures to a host scheduler, owners register a [`TimerKey`] and a
//! [`SimTime`] deadline; the step loop drains every key whose deadline has
//! passed and dispatches it back to the owner along with the deadline, so
//! periodic owners can reschedule from the exact instant rather than from
//! the step that noticed it.
//!
//! Each key has **at most one** pending deadline.  [`TimerQueue::schedule`]
//! removes the previous entry before inserting the new one, so re-triggering
//! a panic or force-setting a signal can never produce a duplicate firing.
//!
//! # Layout
//!
//! `BTreeMap<SimTime, Vec<TimerKey>>` keeps deadlines ordered (O(log W)
//! insert and pop, W = distinct pending deadlines).  A side index
//! `TimerKey → SimTime` makes cancellation O(log W) instead of a scan.

use std::collections::BTreeMap;

use av_core::{AgentId, SignalId, SimTime};

#[cfg(feature = "fx-hash")]
type KeyIndex = rustc_hash::FxHashMap<TimerKey, SimTime>;
#[cfg(not(feature = "fx-hash"))]
type KeyIndex = std::collections::HashMap<TimerKey, SimTime>;

/// Owner of a pending timer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerKey {
    /// Panic override of a vehicle expires.
    PanicReset(AgentId),
    /// A traffic signal advances to its next phase.
    SignalSwitch(SignalId),
}

/// A priority queue of one-shot deadlines, at most one per [`TimerKey`].
#[derive(Default)]
pub struct TimerQueue {
    inner: BTreeMap<SimTime, Vec<TimerKey>>,
    index: KeyIndex,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `at`, replacing any pending deadline for the
    /// same key.
    ///
    /// Returns the replaced deadline, if there was one.
    pub fn schedule(&mut self, key: TimerKey, at: SimTime) -> Option<SimTime> {
        let previous = self.cancel(key);
        self.inner.entry(at).or_default().push(key);
        self.index.insert(key, at);
        previous
    }

    /// Drop the pending deadline for `key`.  Returns it if one existed.
    pub fn cancel(&mut self, key: TimerKey) -> Option<SimTime> {
        let at = self.index.remove(&key)?;
        if let Some(keys) = self.inner.get_mut(&at) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.inner.remove(&at);
            }
        }
        Some(at)
    }

    /// Remove and return every `(deadline, key)` pair with deadline `<= now`.
    ///
    /// Pairs come out in deadline order; keys sharing a deadline come out in
    /// scheduling order.  Returns an empty `Vec` (no allocation) on the common
    /// nothing-due path.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<(SimTime, TimerKey)> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            let at = *entry.key();
            for key in entry.remove() {
                self.index.remove(&key);
                due.push((at, key));
            }
        }
        due
    }

    /// Pending deadline for `key`, if any.
    pub fn deadline(&self, key: TimerKey) -> Option<SimTime> {
        self.index.get(&key).copied()
    }

    /// The earliest pending deadline, or `None` if empty.
    pub fn next_deadline(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
