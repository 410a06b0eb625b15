use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("signal plan parse error: {0}")]
    Parse(String),

    #[error("invalid signal timing: {0}")]
    InvalidTiming(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
