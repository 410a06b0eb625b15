//! Lateral offset tracking for lane changes.

/// What the vehicle is doing, as reported to observers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorMode {
    #[default]
    Normal,
    /// Held in place by a red/amber signal or an obstacle.
    Waiting,
    /// Lateral offset still moving toward its target.
    LaneChanging,
}

impl BehaviorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorMode::Normal       => "normal",
            BehaviorMode::Waiting      => "waiting",
            BehaviorMode::LaneChanging => "lane_changing",
        }
    }
}

/// Relative slack, as a fraction of the manoeuvre length, within which the
/// accumulated travel counts as arrival.  Covers the representation error of
/// `f32` step lengths that are meant to sum to the full distance.
const ARRIVAL_SLACK: f64 = 4.0 * f32::EPSILON as f64;

/// Current and target lateral offset from the path centreline.
///
/// Positive offsets are to the right of the path.  Progress is accumulated in
/// `f64` from the offset the manoeuvre started at, so a change of length `d`
/// at speed `s` lands on the target after `d / s` seconds whatever the step
/// sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneState {
    current:   f32,
    target:    f32,
    /// Offset change rate in units per second.
    speed:     f32,
    /// Where the current manoeuvre began.
    origin:    f32,
    travelled: f64,
}

impl LaneState {
    pub fn new(speed: f32) -> Self {
        Self { current: 0.0, target: 0.0, speed, origin: 0.0, travelled: 0.0 }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_changing(&self) -> bool {
        self.current != self.target
    }

    /// Set the offset to converge to.  Non-finite values are ignored, and
    /// re-setting the same target keeps the manoeuvre's progress.
    ///
    /// No clearance check happens here; callers gate requests with
    /// `VehicleController::is_side_clear`.
    pub fn set_target(&mut self, target: f32) {
        if !target.is_finite() || target == self.target {
            return;
        }
        self.target = target;
        self.origin = self.current;
        self.travelled = 0.0;
    }

    /// Move `current` toward `target` by `speed * dt`.
    ///
    /// A step that reaches the target (within [`ARRIVAL_SLACK`]) or crosses
    /// it lands exactly on it, so the exact-equality mode check is reliable.
    pub fn advance(&mut self, dt: f32) -> (f32, BehaviorMode) {
        if self.current == self.target {
            return (self.current, BehaviorMode::Normal);
        }

        let step = self.speed as f64 * dt as f64;
        if step.is_finite() && step > 0.0 {
            let span = (self.target as f64 - self.origin as f64).abs();
            self.travelled += step;
            if self.travelled >= span - ARRIVAL_SLACK * span.max(1.0) {
                self.current = self.target;
            } else {
                let delta = self.travelled.copysign(self.target as f64 - self.origin as f64);
                self.current = (self.origin as f64 + delta) as f32;
            }
        }

        let mode = if self.current == self.target {
            BehaviorMode::Normal
        } else {
            BehaviorMode::LaneChanging
        };
        (self.current, mode)
    }
}
