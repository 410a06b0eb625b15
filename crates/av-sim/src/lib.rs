//! `av-sim`: fixed-step loop orchestrator for the rust_av framework.
//!
//! # Step loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Timers   : drain due PanicReset / SignalSwitch deadlines:
//!                   PanicReset(v)    → controller v leaves panic mode
//!                   SignalSwitch(s)  → signal s advances, reschedules itself
//!   ② Snapshot : signal phases + every vehicle's position and speed.
//!   ③ Control  : VehicleController::tick for each controlled vehicle
//!                 against the snapshot (parallel with the `parallel` feature).
//!   ④ Actuate  : VehicleBody::apply(speed, steer, dt).
//!   ⑤ World    : rebuild dynamic colliders from the new poses.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`body`]     | `VehicleBody` (kinematic actuation)                   |
//! | [`vehicle`]  | `Vehicle`, `VehicleSpec`, `SignalSite`                |
//! | [`scene`]    | `SimScene` (per-step `Scene` implementation)          |
//! | [`sim`]      | `Sim` (run loop + command API)                        |
//! | [`builder`]  | `SimBuilder`                                          |
//! | [`observer`] | `SimObserver`, `NoopObserver`                         |
//! | [`error`]    | `SimError`, `SimResult<T>`                            |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the control phase on Rayon's thread pool.         |
//! | `fx-hash`  | FxHash for the timer queue's owner index.              |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `VehicleBody`.    |

pub mod body;
pub mod builder;
pub mod error;
pub mod observer;
pub mod scene;
pub mod sim;
pub mod vehicle;


pub use body::{VehicleBody, DEFAULT_HALF_EXTENTS};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use scene::SimScene;
pub use sim::Sim;
pub use vehicle::{SignalSite, Vehicle, VehicleSpec};
