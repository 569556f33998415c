//! Engine-wide base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::{AgentId, TargetId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("target {0} not found")]
    TargetNotFound(TargetId),

    #[error("tag index {0} is out of range (must be below {})", crate::Tag::MAX)]
    InvalidTag(u8),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ua-core`.
pub type CoreResult<T> = Result<T, CoreError>;
