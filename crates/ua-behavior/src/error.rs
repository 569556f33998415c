use thiserror::Error;

use ua_core::{ConsiderationId, Tag};

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior `{0}` has no considerations")]
    NoConsiderations(String),

    #[error("behavior `{name}` has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { name: String, weight: f32 },

    #[error("unknown action type `{0}`")]
    UnknownAction(String),

    #[error("unknown reasoner type `{0}`")]
    UnknownReasoner(String),

    #[error("unknown consideration `{0}`")]
    UnknownConsideration(String),

    #[error("consideration `{0}` is already registered")]
    DuplicateConsideration(String),

    #[error("consideration id {0} is already registered")]
    DuplicateConsiderationId(ConsiderationId),

    #[error("cannot allocate tag `{name}`: at most {} tags are supported", Tag::MAX)]
    TooManyTags { name: String },

    #[error("behavior definition parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// Errors raised by [`ActionRunner`][crate::ActionRunner].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// `execute` was called on an action that already left `Created`.
    #[error("action `{0}` was already executed")]
    AlreadyExecuted(String),
}

pub type ActionResult<T> = Result<T, ActionError>;
