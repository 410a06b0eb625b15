//! `av-schedule`: deferred one-shot timers and traffic-signal cycling.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`timer_queue`] | `TimerKey`, `TimerQueue` (`BTreeMap<SimTime, Vec<TimerKey>>`) |
//! | [`signal`]      | `Phase`, `SignalTiming`, `TrafficSignal`              |
//! | [`loader`]      | `load_signals_csv`, `load_signals_reader`             |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                  |
//!
//! # Timer model (summary)
//!
//! Every deferred callback in the simulation is a `(TimerKey, SimTime)` pair:
//!
//! ```text
//! trigger_panic(agent) at t   →  schedule(PanicReset(agent),  t + 10 s)
//! signal enters phase p at t  →  schedule(SignalSwitch(id),  t + duration(p))
//! step at now                 →  drain_due(now) → dispatch to owners
//! ```
//!
//! `schedule` replaces the key's pending deadline, so re-triggering restarts
//! the window instead of stacking a second firing.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.      |
//! | `fx-hash` | FxHash for the `TimerKey → SimTime` index.              |

pub mod error;
pub mod loader;
pub mod signal;
pub mod timer_queue;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_signals_csv, load_signals_reader};
pub use signal::{Phase, SignalTiming, TrafficSignal};
pub use timer_queue::{TimerKey, TimerQueue};
