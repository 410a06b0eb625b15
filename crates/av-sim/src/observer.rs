//! Hooks into the step loop for telemetry and progress reporting.

use av_core::{SimTime, Tick};

use crate::{SignalSite, Vehicle};

/// Step-loop callbacks.  Every hook defaults to a no-op.
///
/// Hooks borrow simulation state immutably and cannot fail; an observer that
/// does I/O keeps its own error (see `av_output::TelemetryObserver`).
///
/// ```rust,ignore
/// /// Counts steps in which any vehicle was panicking.
/// #[derive(Default)]
/// struct PanicSteps(u64);
///
/// impl SimObserver for PanicSteps {
///     fn on_snapshot(&mut self, _: Tick, _: SimTime, vehicles: &[Vehicle], _: &[SignalSite]) {
///         if vehicles.iter().any(Vehicle::is_panicking) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Before timers fire.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// After actuation and the collider rebuild.  `controlled` counts the
    /// controllers that ran this step.
    fn on_tick_end(&mut self, _tick: Tick, _controlled: usize) {}

    /// Every `output_interval_ticks` steps, post-actuation.  `now` is the
    /// instant the step began.
    fn on_snapshot(
        &mut self,
        _tick:     Tick,
        _now:      SimTime,
        _vehicles: &[Vehicle],
        _signals:  &[SignalSite],
    ) {}

    /// Once, after the last step of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// Observer that ignores every hook.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
