//! `av-control`: decision-and-control core for one road vehicle.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`config`]      | `ControllerConfig`                                         |
//! | [`scene`]       | `Scene` trait (ray cast + signal phases + peer snapshots), `PeerSnapshot` |
//! | [`perception`]  | `sense`, `is_ahead`, `Perception`, `SensedHit`, `HitTarget` |
//! | [`decision`]    | `decide`, `Decision`                                       |
//! | [`kinematics`]  | `braking_distance`, `smooth_speed`                         |
//! | [`steering`]    | `steer`                                                    |
//! | [`lane`]        | `LaneState`, `BehaviorMode`                                |
//! | [`panic`]       | `PanicOverride`, `PanicState`                              |
//! | [`controller`]  | `VehicleController`, `ControlOutput`                       |
//! | [`error`]       | `ControlError`, `ControlResult<T>`                         |
//!
//! # Failure policy
//!
//! Nothing on the per-tick path returns an error.  Missing inputs degrade to
//! a safe default: no body means a clear road and straight wheels, no path or
//! a zero-length path means straight wheels, a near-zero deceleration means a
//! zero braking distance.  Errors exist only for construction
//! (`ControllerConfig::validate`).

pub mod config;
pub mod controller;
pub mod decision;
pub mod error;
pub mod kinematics;
pub mod lane;
pub mod panic;
pub mod perception;
pub mod scene;
pub mod steering;

#[cfg(test)]
mod tests;

pub use config::ControllerConfig;
pub use controller::{ControlOutput, VehicleController};
pub use decision::{decide, Decision};
pub use error::{ControlError, ControlResult};
pub use kinematics::{braking_distance, smooth_speed};
pub use lane::{BehaviorMode, LaneState};
pub use panic::{PanicOverride, PanicState};
pub use perception::{is_ahead, sense, HitTarget, Perception, SensedHit};
pub use scene::{PeerSnapshot, Scene};
pub use steering::steer;
