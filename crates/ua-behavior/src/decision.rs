//! One scored candidate of a decision cycle.
//!
//! # Scoring
//!
//! A decision's score is the weighted, compensated product of its behavior's
//! considerations:
//!
//! ```text
//! score = (c₀ · c₁ · … · cₙ₋₁)^(1/n) · weight · agent_bonus
//! ```
//!
//! The n-th root keeps behaviors with many considerations competitive with
//! behaviors that have few.  Considerations are evaluated in priority order,
//! and evaluation stops early when the running product can no longer beat
//! the best score seen so far in the cycle (see [`Decision::evaluate`]).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use ua_core::{AgentId, ConsiderationId, DataId, TargetId};
use ua_targeting::Target;

use crate::scorers::OPT_IN;
use crate::{Behavior, ConsiderationDecorator, DecisionContext, DecisionData, ScoreCache, ScoreKey};

/// Running products below this are treated as zero.
const ZERO_EPSILON: f32 = 1e-6;

#[derive(Clone)]
pub struct Decision {
    agent:     AgentId,
    behavior:  Arc<Behavior>,
    target:    Option<Target>,
    data:      Option<DecisionData>,
    score:     f32,
    scored:    bool,
    skipped:   bool,
    concluded: bool,
}

impl Decision {
    /// An untargeted, data-less candidate.
    pub fn new(agent: AgentId, behavior: Arc<Behavior>) -> Self {
        Self {
            agent,
            behavior,
            target: None,
            data: None,
            score: 0.0,
            scored: false,
            skipped: false,
            concluded: false,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_data(mut self, data: DecisionData) -> Self {
        self.data = Some(data);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn behavior(&self) -> &Arc<Behavior> {
        &self.behavior
    }

    #[inline]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn target_id(&self) -> Option<TargetId> {
        self.target.map(|t| t.id)
    }

    pub fn decision_data(&self) -> Option<&DecisionData> {
        self.data.as_ref()
    }

    pub fn data_id(&self) -> Option<DataId> {
        self.data.as_ref().map(DecisionData::id)
    }

    /// The attached payload as `T`; `None` if absent or of another type.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_ref().and_then(|d| d.get::<T>())
    }

    /// Score of the last evaluation, bonus included.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        self.scored
    }

    /// `true` if the last evaluation stopped before the final consideration.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    #[inline]
    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    pub fn mark_concluded(&mut self) {
        self.concluded = true;
    }

    /// Upper bound of the score before any agent bonus.
    #[inline]
    pub fn max_score(&self) -> f32 {
        self.behavior.weight()
    }

    /// `true` if both decisions would enact the same thing: same behavior
    /// instance, agent, target and data.  Scores are ignored.
    pub fn is_similar(&self, other: &Decision) -> bool {
        Arc::ptr_eq(&self.behavior, &other.behavior)
            && self.agent == other.agent
            && self.target_id() == other.target_id()
            && self.data_id() == other.data_id()
    }

    /// Cache key of `consideration` evaluated against this decision.
    pub fn score_key(&self, consideration: ConsiderationId) -> ScoreKey {
        ScoreKey {
            agent: self.agent,
            target: self.target_id(),
            data: self.data_id(),
            consideration,
        }
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// Score this decision and return the result.
    ///
    /// `score_threshold` is the best score seen so far in the cycle: once the
    /// optimistic projection of the running product falls below it, the
    /// remaining considerations are skipped.  A running product of zero also
    /// stops evaluation.  `agent_bonus` multiplies the behavior weight
    /// (the agent passes its same-decision bonus here).
    pub fn evaluate(
        &mut self,
        score_threshold: f32,
        agent_bonus:     f32,
        cache:           &mut ScoreCache,
        ctx:             &DecisionContext<'_>,
    ) -> f32 {
        self.scored = true;
        self.skipped = false;

        let bonus = self.behavior.weight() * agent_bonus;
        let considerations = self.behavior.considerations();
        let mut skipped = false;
        let mut final_score = 1.0_f32;

        for (i, consideration) in considerations.iter().enumerate() {
            if final_score < ZERO_EPSILON {
                skipped = true;
                break;
            }
            let projected = final_score.powf(1.0 / (i as f32 + 1.0)) * bonus;
            if projected < score_threshold {
                skipped = true;
                break;
            }
            final_score *= self.consideration_score(consideration, cache, ctx);
        }

        if final_score > 0.0 && !considerations.is_empty() {
            final_score = final_score.powf(1.0 / considerations.len() as f32);
        }
        final_score *= bonus;

        self.skipped = skipped;
        self.score = final_score;
        trace!(
            agent = %self.agent,
            behavior = self.behavior.name(),
            target = ?self.target_id(),
            score = final_score,
            skipped,
            "decision evaluated"
        );
        final_score
    }

    /// One consideration's contribution, through the cache.
    fn consideration_score(
        &self,
        decorator: &ConsiderationDecorator,
        cache:     &mut ScoreCache,
        ctx:       &DecisionContext<'_>,
    ) -> f32 {
        if decorator.is_muted() {
            return OPT_IN;
        }
        let consideration = decorator.consideration();
        let key = self.score_key(consideration.id());
        let raw = match cache.get(&key) {
            Some(score) if consideration.should_cache_score() => score,
            _ => {
                let score = consideration.evaluate(self, ctx);
                cache.insert(key, score);
                score
            }
        };
        decorator.apply(raw)
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decision")
            .field("agent", &self.agent)
            .field("behavior", &self.behavior.name())
            .field("target", &self.target_id())
            .field("data", &self.data_id())
            .field("score", &self.score)
            .field("scored", &self.scored)
            .field("skipped", &self.skipped)
            .field("concluded", &self.concluded)
            .finish()
    }
}
