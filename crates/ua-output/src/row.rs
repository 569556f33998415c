//! Plain data row types written by trace backends.

use ua_agent::DecisionResult;
use ua_behavior::Decision;
use ua_core::{AgentId, DataId, TargetId};

/// One candidate of one decision cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub time:             f64,
    pub agent_id:         u32,
    pub behavior:         String,
    /// `u32::MAX` when the candidate has no target.
    pub target_id:        u32,
    /// `u32::MAX` when the candidate carries no data.
    pub data_id:          u32,
    pub score:            f32,
    pub scored:           bool,
    pub skipped:          bool,
    pub best:             bool,
    pub is_same_decision: bool,
}

impl DecisionRow {
    pub fn from_result(time: f64, agent: AgentId, result: &DecisionResult) -> Self {
        let d = &result.decision;
        Self {
            time,
            agent_id:         agent.0,
            behavior:         d.behavior().name().to_string(),
            target_id:        d.target_id().unwrap_or(TargetId::INVALID).0,
            data_id:          d.data_id().unwrap_or(DataId::INVALID).0,
            score:            d.score(),
            scored:           d.is_scored(),
            skipped:          d.is_skipped(),
            best:             result.best,
            is_same_decision: result.is_same_decision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Enact,
    Interrupt,
    Concluded,
    NoDecision,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Enact => "enact",
            EventKind::Interrupt => "interrupt",
            EventKind::Concluded => "concluded",
            EventKind::NoDecision => "no_decision",
        }
    }
}

/// One lifecycle event of an agent's enacted decision.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub time:      f64,
    pub agent_id:  u32,
    pub kind:      EventKind,
    /// Empty for [`EventKind::NoDecision`].
    pub behavior:  String,
    /// `u32::MAX` when there is no target.
    pub target_id: u32,
}

impl EventRow {
    pub fn new(time: f64, agent: AgentId, kind: EventKind, decision: Option<&Decision>) -> Self {
        Self {
            time,
            agent_id:  agent.0,
            kind,
            behavior:  decision.map(|d| d.behavior().name().to_string()).unwrap_or_default(),
            target_id: decision
                .and_then(Decision::target_id)
                .unwrap_or(TargetId::INVALID)
                .0,
        }
    }
}
