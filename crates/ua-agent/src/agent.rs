//! The `UtilityAgent` struct and its decision loop.

use std::sync::Arc;

use tracing::{debug, trace, warn};
use ua_behavior::{
    ActionContext, ActionRunner, ActionState, Behavior, BehaviorSet, Decision, DecisionContext,
    ScoreCache,
};
use ua_blackboard::Blackboard;
use ua_core::{AgentConfig, AgentId, AgentRng, BehaviorId, ConsiderationId, Position, TargetId};
use ua_targeting::{Target, TargetProvider};

use crate::{AgentError, AgentObserver, AgentResult, DecisionResult};

/// The enacted decision and its live action, if the behavior has one.
struct Enacted {
    decision: Decision,
    runner:   Option<ActionRunner>,
}

// ── UtilityAgent ──────────────────────────────────────────────────────────────

/// A decision-making agent.
///
/// Each agent exclusively owns its state, score cache, target list and
/// running action, so agents can be stepped independently (and in parallel
/// through [`World`][crate::World]).
///
/// Create via [`AgentBuilder`][crate::AgentBuilder].
pub struct UtilityAgent {
    id:             AgentId,
    config:         AgentConfig,
    position:       Position,
    blackboard:     Blackboard,
    rng:            AgentRng,
    behaviors:      Vec<Arc<Behavior>>,
    /// Set when this agent is itself a target in a shared index; it is then
    /// excluded from its own target search.
    target_id:      Option<TargetId>,

    /// Active targets of the last cycle, nearest first.
    targets:        Vec<Target>,
    current:        Option<Enacted>,
    previous:       Option<Decision>,
    cache:          ScoreCache,
    results:        Vec<DecisionResult>,
    decision_timer: f32,
}

impl UtilityAgent {
    pub(crate) fn new(
        id:         AgentId,
        config:     AgentConfig,
        position:   Position,
        blackboard: Blackboard,
        behaviors:  Vec<Arc<Behavior>>,
        target_id:  Option<TargetId>,
    ) -> Self {
        let rng = AgentRng::new(config.seed, id);
        let decision_timer = config.decision_interval;
        Self {
            id,
            config,
            position,
            blackboard,
            rng,
            behaviors,
            target_id,
            targets: Vec::new(),
            current: None,
            previous: None,
            cache: ScoreCache::new(),
            results: Vec::new(),
            decision_timer,
        }
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance the agent by `dt` seconds.
    ///
    /// Runs a decision cycle when the decision interval has elapsed, then
    /// updates the running action.  If the action concludes on its own, a new
    /// cycle runs immediately.
    ///
    /// # Errors
    ///
    /// Propagates action lifecycle violations; a cycle with no viable
    /// decision is not an error.
    pub fn tick<P, O>(&mut self, dt: f32, provider: &P, observer: &mut O) -> AgentResult<()>
    where
        P: TargetProvider + ?Sized,
        O: AgentObserver + ?Sized,
    {
        if self.decision_timer >= self.config.decision_interval {
            self.think(provider, observer)?;
            self.decision_timer = 0.0;
        } else {
            self.decision_timer += dt;
        }
        self.update_action(dt, provider, observer)
    }

    /// Forward a fixed-step update to the running action.
    pub fn fixed_tick(&mut self, dt: f32) {
        if let Some(Enacted { decision, runner: Some(runner) }) = self.current.as_mut() {
            let mut ctx =
                ActionContext::new(decision, &mut self.position, &mut self.blackboard, &mut self.rng);
            runner.fixed_update(dt, &mut ctx);
        }
    }

    /// Run one decision cycle now, regardless of the timer.
    pub fn think<P, O>(&mut self, provider: &P, observer: &mut O) -> AgentResult<()>
    where
        P: TargetProvider + ?Sized,
        O: AgentObserver + ?Sized,
    {
        self.refresh_targets(provider);
        match self.decide(observer) {
            Some(decision) => self.enact(decision, observer),
            None => {
                observer.on_no_decision(self.id);
                Ok(())
            }
        }
    }

    // ── Decision cycle ────────────────────────────────────────────────────

    fn refresh_targets<P: TargetProvider + ?Sized>(&mut self, provider: &P) {
        let origin = self.position;
        let own = self.target_id;
        let mut targets: Vec<Target> = provider
            .search(origin, self.config.target_search_radius)
            .into_iter()
            .filter(|t| t.active && Some(t.id) != own)
            .collect();
        targets.sort_by(|a, b| {
            a.position
                .distance_sq(origin)
                .total_cmp(&b.position.distance_sq(origin))
        });
        targets.truncate(self.config.max_targets_per_decision);
        self.targets = targets;
    }

    /// Score every candidate and return a copy of the winner.
    fn decide<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) -> Option<Decision> {
        let ctx = DecisionContext::new(self.id, self.position, &self.blackboard, &self.targets);
        let mut candidates: Vec<Decision> = self
            .behaviors
            .iter()
            .flat_map(|b| b.build_decisions(&ctx, &self.targets))
            .collect();

        if candidates.is_empty() {
            debug!(agent = %self.id, "no decision candidates");
            return None;
        }
        // Heavier behaviors first: they raise the threshold early.
        candidates.sort_by(|a, b| b.max_score().total_cmp(&a.max_score()));

        self.cache.clear();
        self.results.clear();

        let running = self
            .current
            .as_ref()
            .map(|c| &c.decision)
            .filter(|d| !d.is_concluded());
        let mut best: Option<usize> = None;
        let mut best_score = 0.0_f32;

        for mut decision in candidates {
            let is_same_decision = running.is_some_and(|r| r.is_similar(&decision));
            if decision.max_score() >= best_score {
                let bonus = if is_same_decision { self.config.same_decision_bonus } else { 1.0 };
                let score = decision.evaluate(best_score, bonus, &mut self.cache, &ctx);
                if score > best_score {
                    best_score = score;
                    best = Some(self.results.len());
                }
            }
            self.results.push(DecisionResult { decision, best: false, is_same_decision });
        }

        if let Some(i) = best {
            self.results[i].best = true;
        }
        observer.on_decisions(self.id, &self.results);

        let Some(i) = best else {
            debug!(agent = %self.id, candidates = self.results.len(), "no candidate scored above zero");
            return None;
        };
        let winner = &self.results[i].decision;
        debug!(
            agent = %self.id,
            candidates = self.results.len(),
            behavior = winner.behavior().name(),
            target = ?winner.target_id(),
            score = best_score,
            "decision cycle complete"
        );
        Some(winner.clone())
    }

    /// Make `decision` the running one unless it already is.
    fn enact<O: AgentObserver + ?Sized>(&mut self, decision: Decision, observer: &mut O) -> AgentResult<()> {
        if let Some(current) = &self.current {
            if !current.decision.is_concluded() && current.decision.is_similar(&decision) {
                trace!(agent = %self.id, behavior = decision.behavior().name(), "keeping running decision");
                return Ok(());
            }
        }
        self.interrupt_current(observer);

        debug!(
            agent = %self.id,
            behavior = decision.behavior().name(),
            target = ?decision.target_id(),
            score = decision.score(),
            "enacting decision"
        );
        observer.on_enact(self.id, &decision);

        let mut decision = decision;
        let mut runner = decision.behavior().instantiate_action().map(ActionRunner::new);
        if let Some(runner) = runner.as_mut() {
            let mut ctx =
                ActionContext::new(&decision, &mut self.position, &mut self.blackboard, &mut self.rng);
            if !runner.execute(&mut ctx)? {
                warn!(
                    agent = %self.id,
                    behavior = decision.behavior().name(),
                    action = runner.name(),
                    "action refused to enter; waiting for the next decision interval"
                );
                decision.mark_concluded();
                self.previous = Some(decision);
                return Ok(());
            }
        }
        self.current = Some(Enacted { decision, runner });
        Ok(())
    }

    /// Stop the running action without re-deciding.
    fn interrupt_current<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) {
        let Some(mut enacted) = self.current.take() else {
            return;
        };
        if let Some(runner) = enacted.runner.as_mut() {
            let mut ctx = ActionContext::new(
                &enacted.decision,
                &mut self.position,
                &mut self.blackboard,
                &mut self.rng,
            );
            runner.interrupt(&mut ctx);
        }
        enacted.decision.mark_concluded();
        debug!(agent = %self.id, behavior = enacted.decision.behavior().name(), "interrupted");
        observer.on_interrupt(self.id, &enacted.decision);
        self.previous = Some(enacted.decision);
    }

    fn update_action<P, O>(&mut self, dt: f32, provider: &P, observer: &mut O) -> AgentResult<()>
    where
        P: TargetProvider + ?Sized,
        O: AgentObserver + ?Sized,
    {
        let concluded = match self.current.as_mut() {
            Some(Enacted { decision, runner: Some(runner) }) => {
                let mut ctx =
                    ActionContext::new(decision, &mut self.position, &mut self.blackboard, &mut self.rng);
                runner.update(dt, &mut ctx)
            }
            _ => false,
        };
        if !concluded {
            return Ok(());
        }

        if let Some(mut enacted) = self.current.take() {
            enacted.decision.mark_concluded();
            debug!(agent = %self.id, behavior = enacted.decision.behavior().name(), "action concluded");
            observer.on_action_concluded(self.id, &enacted.decision);
            self.previous = Some(enacted.decision);
        }
        self.think(provider, observer)
    }

    // ── Behavior management ───────────────────────────────────────────────

    /// Add behaviors not already present.  Adding an instance the agent
    /// already has is a no-op.
    ///
    /// # Errors
    ///
    /// Nothing is added if any behavior is rejected.
    ///
    /// - [`AgentError::BehaviorIdConflict`] if a different behavior with the
    ///   same id is present or being added.
    /// - [`AgentError::ConsiderationIdConflict`] if two different
    ///   considerations would share an id, and with it a score cache entry.
    pub fn add_behaviors<I>(&mut self, behaviors: I) -> AgentResult<()>
    where
        I: IntoIterator<Item = Arc<Behavior>>,
    {
        let mut added: Vec<Arc<Behavior>> = Vec::new();
        for behavior in behaviors {
            let known = || self.behaviors.iter().chain(&added);
            if known().any(|b| Arc::ptr_eq(b, &behavior)) {
                continue;
            }
            if known().any(|b| b.id() == behavior.id()) {
                return Err(AgentError::BehaviorIdConflict(behavior.id()));
            }
            for consideration in behavior.considerations().iter().map(|d| d.consideration()) {
                let clash = known()
                    .chain(std::iter::once(&behavior))
                    .flat_map(|b| b.considerations())
                    .map(|d| d.consideration())
                    .any(|c| c.id() == consideration.id() && !Arc::ptr_eq(c, consideration));
                if clash {
                    return Err(AgentError::ConsiderationIdConflict(consideration.id()));
                }
            }
            added.push(behavior);
        }
        self.behaviors.extend(added);
        Ok(())
    }

    pub fn add_behavior_set(&mut self, set: &BehaviorSet) -> AgentResult<()> {
        self.add_behaviors(set.behaviors.iter().cloned())
    }

    /// Remove behaviors by id.  A running decision of a removed behavior
    /// keeps running until it concludes or is replaced.
    pub fn remove_behaviors<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = BehaviorId>,
    {
        let ids: Vec<BehaviorId> = ids.into_iter().collect();
        self.behaviors.retain(|b| !ids.contains(&b.id()));
    }

    pub fn remove_behavior_set(&mut self, set: &BehaviorSet) {
        self.remove_behaviors(set.behaviors.iter().map(|b| b.id()));
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn behaviors(&self) -> &[Arc<Behavior>] {
        &self.behaviors
    }

    pub fn target_id(&self) -> Option<TargetId> {
        self.target_id
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Every candidate of the last completed scoring pass.
    pub fn decision_results(&self) -> &[DecisionResult] {
        &self.results
    }

    /// The score `consideration` produced for `decision` in the last pass,
    /// before any inversion.
    pub fn cached_score(&self, decision: &Decision, consideration: ConsiderationId) -> Option<f32> {
        self.cache.get(&decision.score_key(consideration))
    }

    pub fn current_decision(&self) -> Option<&Decision> {
        self.current.as_ref().map(|c| &c.decision)
    }

    /// State of the running action; `None` when idle or action-less.
    pub fn current_action_state(&self) -> Option<ActionState> {
        self.current
            .as_ref()
            .and_then(|c| c.runner.as_ref())
            .map(ActionRunner::state)
    }

    /// The decision most recently replaced, concluded, or refused.
    pub fn previous_decision(&self) -> Option<&Decision> {
        self.previous.as_ref()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Seconds accumulated towards the next timer-driven cycle.
    pub fn decision_timer(&self) -> f32 {
        self.decision_timer
    }
}

impl std::fmt::Debug for UtilityAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtilityAgent")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("behaviors", &self.behaviors.len())
            .field("current", &self.current_decision())
            .finish()
    }
}
