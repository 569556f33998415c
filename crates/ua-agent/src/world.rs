//! Many agents sharing one target index.

use ua_core::{AgentId, CoreError};
use ua_targeting::SpatialTargetIndex;

use crate::{AgentError, AgentObserver, AgentResult, UtilityAgent};

/// Steps a population of agents against a shared [`SpatialTargetIndex`].
///
/// Each step:
///
/// 1. ticks every agent in insertion order (on Rayon's pool with the
///    `parallel` feature; the index is only read);
/// 2. moves the index entry of every agent registered as a target to the
///    agent's new position.
pub struct World {
    agents:  Vec<UtilityAgent>,
    targets: SpatialTargetIndex,
    time:    f64,
}

impl World {
    pub fn new(targets: SpatialTargetIndex) -> Self {
        Self { agents: Vec::new(), targets, time: 0.0 }
    }

    /// # Errors
    ///
    /// - [`AgentError::DuplicateAgent`] if an agent with the same id exists.
    /// - [`AgentError::Targeting`] if the agent is registered as a target
    ///   that the index does not contain.
    pub fn add_agent(&mut self, agent: UtilityAgent) -> AgentResult<()> {
        if self.agents.iter().any(|a| a.id() == agent.id()) {
            return Err(AgentError::DuplicateAgent(agent.id()));
        }
        if let Some(target) = agent.target_id() {
            self.targets.move_to(target, agent.position())?;
        }
        self.agents.push(agent);
        Ok(())
    }

    pub fn agents(&self) -> &[UtilityAgent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> AgentResult<&UtilityAgent> {
        self.agents
            .iter()
            .find(|a| a.id() == id)
            .ok_or(AgentError::Core(CoreError::AgentNotFound(id)))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> AgentResult<&mut UtilityAgent> {
        self.agents
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(AgentError::Core(CoreError::AgentNotFound(id)))
    }

    pub fn targets(&self) -> &SpatialTargetIndex {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut SpatialTargetIndex {
        &mut self.targets
    }

    /// Seconds simulated so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance every agent by `dt` seconds.
    pub fn step<O: AgentObserver>(&mut self, dt: f32, observer: &mut O) -> AgentResult<()> {
        observer.on_step_start(self.time);

        #[cfg(not(feature = "parallel"))]
        {
            for agent in &mut self.agents {
                agent.tick(dt, &self.targets, observer)?;
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            use crate::EventLog;

            let targets = &self.targets;
            let outcomes: Vec<(AgentResult<()>, EventLog)> = self
                .agents
                .par_iter_mut()
                .map(|agent| {
                    let mut log = EventLog::new();
                    let result = agent.tick(dt, targets, &mut log);
                    (result, log)
                })
                .collect();
            // Replay in agent order so observers see a deterministic sequence.
            for (result, log) in outcomes {
                log.replay(observer);
                result?;
            }
        }

        for agent in &self.agents {
            if let Some(target) = agent.target_id() {
                self.targets.move_to(target, agent.position())?;
            }
        }
        self.time += f64::from(dt);
        Ok(())
    }

    /// Forward a fixed-step update to every agent's running action.
    pub fn fixed_step(&mut self, dt: f32) {
        for agent in &mut self.agents {
            agent.fixed_tick(dt);
        }
    }

    /// Run `n` steps of `dt` seconds.
    pub fn run_steps<O: AgentObserver>(&mut self, n: u64, dt: f32, observer: &mut O) -> AgentResult<()> {
        for _ in 0..n {
            self.step(dt, observer)?;
        }
        Ok(())
    }
}
