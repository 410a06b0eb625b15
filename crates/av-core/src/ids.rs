//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into per-agent `Vec`s via `id.0 as usize`, but callers
//! should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a vehicle agent in the simulation's vehicle list.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a traffic signal.
    pub struct SignalId(u32);
}

typed_id! {
    /// Index of a static, unclassified obstacle (barrier, debris, wall).
    pub struct ObstacleId(u32);
}

typed_id! {
    /// Index of a reference path registered with the simulation.
    pub struct PathId(u32);
}

// ── EntityId ──────────────────────────────────────────────────────────────────

/// Anything a sensing ray can hit.
///
/// The variant is the capability tag the perception module inspects to decide
/// how to react: signals expose a phase, vehicles may expose a speed, and
/// obstacles expose nothing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityId {
    Vehicle(AgentId),
    Signal(SignalId),
    Obstacle(ObstacleId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Vehicle(id)  => id.fmt(f),
            EntityId::Signal(id)   => id.fmt(f),
            EntityId::Obstacle(id) => id.fmt(f),
        }
    }
}

impl From<AgentId> for EntityId {
    fn from(id: AgentId) -> Self {
        EntityId::Vehicle(id)
    }
}

impl From<SignalId> for EntityId {
    fn from(id: SignalId) -> Self {
        EntityId::Signal(id)
    }
}

impl From<ObstacleId> for EntityId {
    fn from(id: ObstacleId) -> Self {
        EntityId::Obstacle(id)
    }
}
