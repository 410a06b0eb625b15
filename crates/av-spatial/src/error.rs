//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `av-spatial` constructors.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("reference path needs at least 2 points, got {0}")]
    DegeneratePath(usize),

    #[error("non-finite coordinate at path point {0}")]
    NonFinitePoint(usize),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
