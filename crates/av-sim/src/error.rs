use av_control::ControlError;
use av_core::{AgentId, AvError, PathId, SignalId};
use av_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] AvError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("unknown vehicle {0}")]
    UnknownAgent(AgentId),

    #[error("vehicle {0} has no controller")]
    Uncontrolled(AgentId),

    #[error("unknown signal {0}")]
    UnknownSignal(SignalId),

    #[error("unknown path {0}")]
    UnknownPath(PathId),
}

pub type SimResult<T> = Result<T, SimError>;
