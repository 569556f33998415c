//! Targeting error type.

use thiserror::Error;

use ua_core::TargetId;

/// Errors produced by `ua-targeting`.
#[derive(Debug, Error)]
pub enum TargetingError {
    #[error("target {0} is already indexed")]
    DuplicateTarget(TargetId),

    #[error("target {0} not found in index")]
    TargetNotFound(TargetId),
}

pub type TargetingResult<T> = Result<T, TargetingError>;
