//! Target-speed selection from the forward perception.

use av_schedule::Phase;

use crate::perception::{HitTarget, Perception};

/// Fraction of the current speed kept when closing on a leader that
/// publishes no speed.
pub const UNKNOWN_LEADER_SPEED_FACTOR: f32 = 0.8;

/// Output of [`decide`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decision {
    pub target_speed: f32,
    /// New value for the controller's cached signal phase.  `None` leaves the
    /// cache untouched (leader and obstacle branches).
    pub observed_phase: Option<Phase>,
    /// The vehicle is being held by a red/amber signal or an obstacle.
    pub held: bool,
}

impl Decision {
    fn free_flow(max_speed: f32) -> Self {
        Self { target_speed: max_speed, observed_phase: Some(Phase::Go), held: false }
    }
}

/// Pick the target speed, in priority order:
///
/// 1. nothing ahead → `max_speed`;
/// 2. signal → stop on Stop/Caution, `max_speed` on Go; ignored while
///    panicking;
/// 3. leader inside `safe_following_distance` → its speed, or
///    `0.8 × current_speed` if it publishes none; further away → `max_speed`;
/// 4. any other obstacle → 0.
pub fn decide(
    perception:              &Perception,
    panicking:               bool,
    current_speed:           f32,
    max_speed:               f32,
    safe_following_distance: f32,
) -> Decision {
    let Some(hit) = perception.ahead() else {
        return Decision::free_flow(max_speed);
    };

    match hit.target {
        HitTarget::Signal { .. } if panicking => Decision::free_flow(max_speed),
        HitTarget::Signal { phase, .. } => match phase {
            Phase::Stop | Phase::Caution => Decision {
                target_speed:   0.0,
                observed_phase: Some(phase),
                held:           true,
            },
            Phase::Go => Decision::free_flow(max_speed),
        },
        HitTarget::Peer { speed, .. } => {
            let target_speed = if hit.distance < safe_following_distance {
                match speed {
                    Some(s) => s.max(0.0),
                    None    => (current_speed * UNKNOWN_LEADER_SPEED_FACTOR).max(0.0),
                }
            } else {
                max_speed
            };
            Decision { target_speed, observed_phase: None, held: false }
        }
        HitTarget::Obstacle => Decision { target_speed: 0.0, observed_phase: None, held: true },
    }
}
