//! `av-core`: foundational types for the `rust_av` vehicle-control framework.
//!
//! This crate is a dependency of every other `av-*` crate.  It intentionally
//! has no `av-*` dependencies and few external ones (`nalgebra`, `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `SignalId`, `ObstacleId`, `PathId`, `EntityId` |
//! | [`geo`]         | `Vec3`, `BodyPose`, safe normalisation helpers        |
//! | [`time`]        | `Tick`, `SimTime`, `SimClock`, `SimConfig`            |
//! | [`rng`]         | `SimRng` (scenario generation)                        |
//! | [`error`]       | `AvError`, `AvResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AvError, AvResult};
pub use geo::{BodyPose, Vec3};
pub use ids::{AgentId, EntityId, ObstacleId, PathId, SignalId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime, Tick};
