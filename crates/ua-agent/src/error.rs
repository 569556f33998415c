use thiserror::Error;

use ua_behavior::ActionError;
use ua_core::{AgentId, BehaviorId, ConsiderationId, CoreError};
use ua_targeting::TargetingError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("action lifecycle error: {0}")]
    Action(#[from] ActionError),

    #[error("agent {0} is already in the world")]
    DuplicateAgent(AgentId),

    #[error("behavior id {0} already belongs to a different behavior")]
    BehaviorIdConflict(BehaviorId),

    #[error("consideration id {0} is shared by different considerations")]
    ConsiderationIdConflict(ConsiderationId),

    #[error("targeting error: {0}")]
    Targeting(#[from] TargetingError),
}

pub type AgentResult<T> = Result<T, AgentError>;
