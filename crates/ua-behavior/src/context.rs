//! Read-only agent snapshot passed to every scorer and reasoner.

use ua_blackboard::Blackboard;
use ua_core::{AgentId, Position};
use ua_targeting::Target;

/// A read-only snapshot of the deciding agent.
///
/// Built once per decision cycle by the agent and shared (immutably) across
/// all candidate expansions and consideration evaluations of that cycle.
///
/// # Lifetimes
///
/// All borrows live for the duration of one decision cycle.  The agent never
/// allows mutable access to its blackboard while a `DecisionContext` is live.
#[derive(Copy, Clone)]
pub struct DecisionContext<'a> {
    /// The deciding agent.
    pub agent: AgentId,

    /// The agent's position at the start of the cycle.
    pub position: Position,

    /// The agent's state.
    pub blackboard: &'a Blackboard,

    /// Active targets of this cycle, nearest first.
    pub targets: &'a [Target],
}

impl<'a> DecisionContext<'a> {
    #[inline]
    pub fn new(
        agent:      AgentId,
        position:   Position,
        blackboard: &'a Blackboard,
        targets:    &'a [Target],
    ) -> Self {
        Self { agent, position, blackboard, targets }
    }
}
