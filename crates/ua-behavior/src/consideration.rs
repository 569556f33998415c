//! Considerations: the scoring units of the engine.
//!
//! A [`Consideration`] is either a **leaf**, which delegates the raw score to
//! a domain [`Scorer`], or a **composite**, which multiplies the scores of
//! its children.  Both share the same settings (priority, cacheability,
//! target filter) and the same evaluation contract:
//!
//! 1. opt out with `0` if a target is required but absent or mis-tagged;
//! 2. compute the raw score;
//! 3. clamp it to `[0, 1]`.
//!
//! Considerations are immutable once built and shared as
//! `Arc<Consideration>`, so the same instance can appear in many behaviors
//! and composites.  Ownership is a tree by construction: a composite can
//! only hold children that already exist.

use std::fmt;
use std::sync::Arc;

use ua_core::{ConsiderationId, TagSet};

use crate::scorers::{OPT_OUT, clamp01};
use crate::{Decision, DecisionContext};

// ── Scorer ────────────────────────────────────────────────────────────────────

/// Domain scoring logic for a leaf consideration.
///
/// Implementations must be pure given their inputs and may return any
/// value; the owning [`Consideration`] clamps it.  When an input the scorer
/// needs is missing (e.g. a blackboard entry), return [`OPT_OUT`] rather than
/// panicking.
pub trait Scorer: Send + Sync {
    fn score(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32;
}

/// Adapter turning a closure into a [`Scorer`].
struct FnScorer<F>(F);

impl<F> Scorer for FnScorer<F>
where
    F: Fn(&Decision, &DecisionContext<'_>) -> f32 + Send + Sync,
{
    #[inline]
    fn score(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32 {
        (self.0)(decision, ctx)
    }
}

// ── Consideration ─────────────────────────────────────────────────────────────

/// The two consideration variants.
pub enum ConsiderationKind {
    Leaf(Box<dyn Scorer>),
    /// Multiplicative (AND-like): any zero child forces zero.
    Composite(Vec<Arc<Consideration>>),
}

pub struct Consideration {
    id:                   ConsiderationId,
    name:                 String,
    priority:             i32,
    should_cache_score:   bool,
    requires_target:      bool,
    required_target_tags: TagSet,
    kind:                 ConsiderationKind,
}

impl Consideration {
    fn with_kind(id: ConsiderationId, name: impl Into<String>, kind: ConsiderationKind) -> Self {
        Self {
            id,
            name: name.into(),
            priority: 0,
            should_cache_score: true,
            requires_target: false,
            required_target_tags: TagSet::EMPTY,
            kind,
        }
    }

    /// A leaf backed by any [`Scorer`].
    pub fn leaf(id: ConsiderationId, name: impl Into<String>, scorer: impl Scorer + 'static) -> Self {
        Self::with_kind(id, name, ConsiderationKind::Leaf(Box::new(scorer)))
    }

    /// A leaf backed by a closure.
    pub fn from_fn<F>(id: ConsiderationId, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Decision, &DecisionContext<'_>) -> f32 + Send + Sync + 'static,
    {
        Self::with_kind(id, name, ConsiderationKind::Leaf(Box::new(FnScorer(f))))
    }

    /// A composite scoring the product of `children`.
    pub fn composite(
        id:       ConsiderationId,
        name:     impl Into<String>,
        children: Vec<Arc<Consideration>>,
    ) -> Self {
        Self::with_kind(id, name, ConsiderationKind::Composite(children))
    }

    // ── Settings (builder style) ──────────────────────────────────────────

    /// Higher priorities are evaluated first within a behavior.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Disable when the score may vary between evaluations of the same
    /// (agent, target, data) within one cycle.
    pub fn with_cache(mut self, should_cache_score: bool) -> Self {
        self.should_cache_score = should_cache_score;
        self
    }

    /// Opt out when the decision has no target.
    pub fn requiring_target(mut self) -> Self {
        self.requires_target = true;
        self
    }

    /// Opt out unless the target carries all of `tags`.  Implies
    /// [`requiring_target`][Self::requiring_target].
    pub fn with_required_tags(mut self, tags: TagSet) -> Self {
        self.requires_target = true;
        self.required_target_tags = tags;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ConsiderationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn requires_target(&self) -> bool {
        self.requires_target
    }

    pub fn required_target_tags(&self) -> TagSet {
        self.required_target_tags
    }

    pub fn kind(&self) -> &ConsiderationKind {
        &self.kind
    }

    /// A composite is only cacheable if it and every child are.
    pub fn should_cache_score(&self) -> bool {
        match &self.kind {
            ConsiderationKind::Leaf(_) => self.should_cache_score,
            ConsiderationKind::Composite(children) => {
                self.should_cache_score && children.iter().all(|c| c.should_cache_score())
            }
        }
    }

    /// Sub-considerations, for inspection.  `None` for leaves.
    pub fn children(&self) -> Option<&[Arc<Consideration>]> {
        match &self.kind {
            ConsiderationKind::Leaf(_) => None,
            ConsiderationKind::Composite(children) => Some(children),
        }
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// `true` if the target filter vetoes `decision` outright.
    pub fn opts_out(&self, decision: &Decision) -> bool {
        if !self.requires_target {
            return false;
        }
        match decision.target() {
            None => true,
            Some(target) => !target.has_tags(self.required_target_tags),
        }
    }

    /// Score `decision`, clamped to `[0, 1]`.
    pub fn evaluate(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32 {
        if self.opts_out(decision) {
            return OPT_OUT;
        }
        let raw = match &self.kind {
            ConsiderationKind::Leaf(scorer) => scorer.score(decision, ctx),
            ConsiderationKind::Composite(children) => children
                .iter()
                .map(|c| c.evaluate(decision, ctx))
                .product(),
        };
        clamp01(raw)
    }
}

impl fmt::Debug for Consideration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Consideration");
        s.field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("cache", &self.should_cache_score());
        if let Some(children) = self.children() {
            s.field("children", &children.len());
        }
        s.finish()
    }
}
