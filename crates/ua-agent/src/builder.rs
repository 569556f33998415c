//! Fluent builder for constructing a [`UtilityAgent`].

use std::sync::Arc;

use ua_behavior::{Behavior, BehaviorSet};
use ua_blackboard::Blackboard;
use ua_core::{AgentConfig, AgentId, Position, TargetId};

use crate::{AgentResult, UtilityAgent};

/// Fluent builder for [`UtilityAgent`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                 |
/// |----------------------|-------------------------|
/// | `.config(c)`         | `AgentConfig::default()`|
/// | `.position(p)`       | `Position::ORIGIN`      |
/// | `.blackboard(b)`     | empty                   |
/// | `.behavior(b)`       | no behaviors            |
/// | `.behavior_set(s)`   | no behaviors            |
/// | `.as_target(id)`     | not a target            |
///
/// # Example
///
/// ```rust,ignore
/// let agent = AgentBuilder::new(AgentId(3))
///     .config(config)
///     .position(Position::new(10.0, 4.0))
///     .blackboard(Blackboard::new().with(Stamina(100.0)))
///     .behavior_set(&guard_set)
///     .build()?;
/// ```
pub struct AgentBuilder {
    id:         AgentId,
    config:     AgentConfig,
    position:   Position,
    blackboard: Blackboard,
    behaviors:  Vec<Arc<Behavior>>,
    target_id:  Option<TargetId>,
}

impl AgentBuilder {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            config:     AgentConfig::default(),
            position:   Position::ORIGIN,
            blackboard: Blackboard::new(),
            behaviors:  Vec::new(),
            target_id:  None,
        }
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    pub fn behavior(mut self, behavior: Arc<Behavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// The base behavior set.  May be called more than once.
    pub fn behavior_set(mut self, set: &BehaviorSet) -> Self {
        self.behaviors.extend(set.behaviors.iter().cloned());
        self
    }

    /// Mark the agent as target `id` in a shared index.  [`World`][crate::World]
    /// keeps that target's position in sync with the agent's.
    pub fn as_target(mut self, id: TargetId) -> Self {
        self.target_id = Some(id);
        self
    }

    /// Validate the configuration and return the agent.
    ///
    /// A behavior instance added more than once is kept once.  Id conflicts
    /// are rejected as in [`UtilityAgent::add_behaviors`].
    pub fn build(self) -> AgentResult<UtilityAgent> {
        self.config.validate()?;
        let mut agent = UtilityAgent::new(
            self.id,
            self.config,
            self.position,
            self.blackboard,
            Vec::new(),
            self.target_id,
        );
        agent.add_behaviors(self.behaviors)?;
        Ok(agent)
    }
}
