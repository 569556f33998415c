//! Agent observer trait for logging, tracing and debugging.

use ua_behavior::Decision;
use ua_core::AgentId;

use crate::DecisionResult;

/// Callbacks invoked by [`UtilityAgent`][crate::UtilityAgent] at key points
/// of its decision loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: enactment printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl AgentObserver for Printer {
///     fn on_enact(&mut self, agent: AgentId, decision: &Decision) {
///         println!("{agent} → {}", decision.behavior().name());
///     }
/// }
/// ```
pub trait AgentObserver {
    /// Called by [`World::step`][crate::World::step] before any agent ticks.
    fn on_step_start(&mut self, _time: f64) {}

    /// Called after every completed scoring pass with all candidates.
    fn on_decisions(&mut self, _agent: AgentId, _results: &[DecisionResult]) {}

    /// Called when a new decision replaces the running one.
    fn on_enact(&mut self, _agent: AgentId, _decision: &Decision) {}

    /// Called when a cycle ends with no viable candidate.
    fn on_no_decision(&mut self, _agent: AgentId) {}

    /// Called when the running action is interrupted by a new decision.
    fn on_interrupt(&mut self, _agent: AgentId, _decision: &Decision) {}

    /// Called when the running action concludes on its own.
    fn on_action_concluded(&mut self, _agent: AgentId, _decision: &Decision) {}
}

/// An [`AgentObserver`] that does nothing.
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

// ── Recording ─────────────────────────────────────────────────────────────────

/// An owned copy of one observer callback.
#[derive(Clone, Debug)]
pub enum AgentEvent {
    Decisions(AgentId, Vec<DecisionResult>),
    Enact(AgentId, Decision),
    NoDecision(AgentId),
    Interrupt(AgentId, Decision),
    ActionConcluded(AgentId, Decision),
}

/// Records callbacks so they can be inspected or replayed later.
///
/// Used by the parallel world step to buffer each agent's callbacks.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<AgentEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every recorded event to `observer`, in recording order.
    pub fn replay<O: AgentObserver + ?Sized>(&self, observer: &mut O) {
        for event in &self.events {
            match event {
                AgentEvent::Decisions(a, r) => observer.on_decisions(*a, r),
                AgentEvent::Enact(a, d) => observer.on_enact(*a, d),
                AgentEvent::NoDecision(a) => observer.on_no_decision(*a),
                AgentEvent::Interrupt(a, d) => observer.on_interrupt(*a, d),
                AgentEvent::ActionConcluded(a, d) => observer.on_action_concluded(*a, d),
            }
        }
    }

    /// Names of the enacted behaviors, in order.
    pub fn enacted(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::Enact(_, d) => Some(d.behavior().name()),
                _ => None,
            })
            .collect()
    }
}

impl AgentObserver for EventLog {
    fn on_decisions(&mut self, agent: AgentId, results: &[DecisionResult]) {
        self.events.push(AgentEvent::Decisions(agent, results.to_vec()));
    }

    fn on_enact(&mut self, agent: AgentId, decision: &Decision) {
        self.events.push(AgentEvent::Enact(agent, decision.clone()));
    }

    fn on_no_decision(&mut self, agent: AgentId) {
        self.events.push(AgentEvent::NoDecision(agent));
    }

    fn on_interrupt(&mut self, agent: AgentId, decision: &Decision) {
        self.events.push(AgentEvent::Interrupt(agent, decision.clone()));
    }

    fn on_action_concluded(&mut self, agent: AgentId, decision: &Decision) {
        self.events.push(AgentEvent::ActionConcluded(agent, decision.clone()));
    }
}
