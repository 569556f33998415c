//! Behaviors: immutable templates from which decisions are generated.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use ua_core::{BehaviorId, TagSet};
use ua_targeting::Target;

use crate::{
    Action, ActionTemplate, BehaviorError, BehaviorResult, ConsiderationDecorator, Decision,
    DecisionContext, DefaultReasoner, Reasoner,
};

// ── Behavior ──────────────────────────────────────────────────────────────────

/// A named bundle of considerations, an optional action, and the reasoner
/// that expands it into candidates.
///
/// Built once through [`BehaviorBuilder`] and shared as `Arc<Behavior>` by
/// every decision it produces.
pub struct Behavior {
    id:                   BehaviorId,
    name:                 String,
    action:               Option<Arc<dyn ActionTemplate>>,
    reasoner:             Arc<dyn Reasoner>,
    /// Sorted by descending priority, stable.
    considerations:       Vec<ConsiderationDecorator>,
    weight:               f32,
    requires_target:      bool,
    required_target_tags: TagSet,
}

impl Behavior {
    pub fn builder(id: BehaviorId, name: impl Into<String>) -> BehaviorBuilder {
        BehaviorBuilder::new(id, name)
    }

    #[inline]
    pub fn id(&self) -> BehaviorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn considerations(&self) -> &[ConsiderationDecorator] {
        &self.considerations
    }

    pub fn requires_target(&self) -> bool {
        self.requires_target
    }

    pub fn required_target_tags(&self) -> TagSet {
        self.required_target_tags
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// `true` if `target` passes this behavior's target filter.
    #[inline]
    pub fn accepts_target(&self, target: &Target) -> bool {
        target.has_tags(self.required_target_tags)
    }

    /// Expand into this cycle's candidates via the behavior's reasoner.
    pub fn build_decisions(
        self:    &Arc<Self>,
        ctx:     &DecisionContext<'_>,
        targets: &[Target],
    ) -> Vec<Decision> {
        self.reasoner.build_decisions(ctx, self, targets)
    }

    /// A fresh action instance, or `None` for action-less behaviors.
    pub fn instantiate_action(&self) -> Option<Box<dyn Action>> {
        self.action.as_ref().map(|t| t.instantiate())
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("considerations", &self.considerations.len())
            .field("requires_target", &self.requires_target)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

// ── BehaviorBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Behavior`].
///
/// # Example
///
/// ```rust,ignore
/// let chase = Behavior::builder(BehaviorId(0), "Chase")
///     .consideration(in_sight)
///     .consideration(ConsiderationDecorator::new(tired).with_inverted(true))
///     .action(ChaseAction::default())
///     .requiring_target()
///     .weight(2.0)
///     .build()?;
/// ```
pub struct BehaviorBuilder {
    id:                   BehaviorId,
    name:                 String,
    action:               Option<Arc<dyn ActionTemplate>>,
    reasoner:             Option<Arc<dyn Reasoner>>,
    considerations:       Vec<ConsiderationDecorator>,
    weight:               f32,
    requires_target:      bool,
    required_target_tags: TagSet,
}

impl BehaviorBuilder {
    pub fn new(id: BehaviorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            action: None,
            reasoner: None,
            considerations: Vec::new(),
            weight: 1.0,
            requires_target: false,
            required_target_tags: TagSet::EMPTY,
        }
    }

    pub fn consideration(mut self, consideration: impl Into<ConsiderationDecorator>) -> Self {
        self.considerations.push(consideration.into());
        self
    }

    pub fn action(mut self, template: impl ActionTemplate + 'static) -> Self {
        self.action = Some(Arc::new(template));
        self
    }

    pub fn shared_action(mut self, template: Arc<dyn ActionTemplate>) -> Self {
        self.action = Some(template);
        self
    }

    /// Defaults to [`DefaultReasoner`].
    pub fn reasoner(mut self, reasoner: Arc<dyn Reasoner>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }

    /// Must be finite and strictly positive.  Defaults to `1.0`.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn requiring_target(mut self) -> Self {
        self.requires_target = true;
        self
    }

    /// Implies [`requiring_target`][Self::requiring_target].
    pub fn with_required_tags(mut self, tags: TagSet) -> Self {
        self.requires_target = true;
        self.required_target_tags = tags;
        self
    }

    /// # Errors
    ///
    /// - [`BehaviorError::NoConsiderations`] if no consideration was added.
    /// - [`BehaviorError::InvalidWeight`] if the weight is not finite and > 0.
    pub fn build(self) -> BehaviorResult<Arc<Behavior>> {
        if self.considerations.is_empty() {
            return Err(BehaviorError::NoConsiderations(self.name));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(BehaviorError::InvalidWeight { name: self.name, weight: self.weight });
        }

        let mut considerations = self.considerations;
        considerations.sort_by_key(|c| Reverse(c.priority()));

        Ok(Arc::new(Behavior {
            id: self.id,
            name: self.name,
            action: self.action,
            reasoner: self.reasoner.unwrap_or_else(|| Arc::new(DefaultReasoner)),
            considerations,
            weight: self.weight,
            requires_target: self.requires_target,
            required_target_tags: self.required_target_tags,
        }))
    }
}

// ── BehaviorSet ───────────────────────────────────────────────────────────────

/// A named group of behaviors added to or removed from an agent together.
#[derive(Clone, Debug, Default)]
pub struct BehaviorSet {
    pub name:      String,
    pub behaviors: Vec<Arc<Behavior>>,
}

impl BehaviorSet {
    pub fn new(name: impl Into<String>, behaviors: Vec<Arc<Behavior>>) -> Self {
        Self { name: name.into(), behaviors }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Behavior>> + '_ {
        self.behaviors.iter()
    }
}
