//! `av-spatial`: spatial queries consumed by the vehicle controller.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`world`]   | `RayCaster` trait, `RayHit`, `Aabb`, `Collider`, `World` (R-tree) |
//! | [`path`]    | `ReferencePath` trait, `PolylinePath`                           |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                              |
//!
//! The controller only ever talks to the two traits.  `World` and
//! `PolylinePath` are the reference implementations used by `av-sim`; tests
//! and host engines are free to substitute their own.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod path;
pub mod world;


pub use error::{SpatialError, SpatialResult};
pub use path::{PolylinePath, ReferencePath};
pub use world::{Aabb, Collider, RayCaster, RayHit, World};
