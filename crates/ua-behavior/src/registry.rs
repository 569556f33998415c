//! Name-keyed factory for everything a behavior definition refers to.
//!
//! Behavior definitions (see [`loader`][crate::loader]) name their action
//! type, reasoner type, considerations and target tags as strings.  The
//! [`Registry`] resolves those names to the shared objects registered by the
//! host application.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use ua_core::{BehaviorId, ConsiderationId, Tag, TagSet};

use crate::{
    ActionTemplate, Behavior, BehaviorDef, BehaviorError, BehaviorResult, BehaviorSet,
    BehaviorSetDef, Consideration, ConsiderationDecorator, DefaultReasoner, PerTargetReasoner,
    Reasoner, UntargetedReasoner,
};

// Shared by every registry in the process, so behaviors and considerations
// built through different registries never share an id on one agent.
static NEXT_BEHAVIOR: AtomicU32 = AtomicU32::new(0);
static NEXT_CONSIDERATION: AtomicU32 = AtomicU32::new(0);

pub struct Registry {
    actions:            HashMap<String, Arc<dyn ActionTemplate>>,
    reasoners:          HashMap<String, Arc<dyn Reasoner>>,
    considerations:     HashMap<String, Arc<Consideration>>,
    tags:               HashMap<String, Tag>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry with the built-in reasoners `"default"`, `"per_target"` and
    /// `"untargeted"`.
    pub fn new() -> Self {
        let mut reasoners: HashMap<String, Arc<dyn Reasoner>> = HashMap::new();
        reasoners.insert("default".into(), Arc::new(DefaultReasoner));
        reasoners.insert("per_target".into(), Arc::new(PerTargetReasoner));
        reasoners.insert("untargeted".into(), Arc::new(UntargetedReasoner));
        Self {
            actions: HashMap::new(),
            reasoners,
            considerations: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn register_action(&mut self, name: impl Into<String>, template: impl ActionTemplate + 'static) {
        self.actions.insert(name.into(), Arc::new(template));
    }

    pub fn register_reasoner(&mut self, name: impl Into<String>, reasoner: Arc<dyn Reasoner>) {
        self.reasoners.insert(name.into(), reasoner);
    }

    /// Register under the consideration's own name.  Returns the shared
    /// handle.
    ///
    /// # Errors
    ///
    /// - [`BehaviorError::DuplicateConsideration`] if the name is taken.
    /// - [`BehaviorError::DuplicateConsiderationId`] if another registered
    ///   consideration has the same id.
    pub fn register_consideration(
        &mut self,
        consideration: Consideration,
    ) -> BehaviorResult<Arc<Consideration>> {
        if self.considerations.contains_key(consideration.name()) {
            return Err(BehaviorError::DuplicateConsideration(consideration.name().to_string()));
        }
        if self.considerations.values().any(|c| c.id() == consideration.id()) {
            return Err(BehaviorError::DuplicateConsiderationId(consideration.id()));
        }
        let shared = Arc::new(consideration);
        self.considerations.insert(shared.name().to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    /// A fresh id for a consideration about to be registered.  Unique across
    /// all registries in the process.
    pub fn next_consideration_id(&self) -> ConsiderationId {
        ConsiderationId(NEXT_CONSIDERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// The tag called `name`, allocating the next free index on first use.
    ///
    /// # Errors
    ///
    /// [`BehaviorError::TooManyTags`] once all [`Tag::MAX`] tags are taken.
    pub fn tag(&mut self, name: &str) -> BehaviorResult<Tag> {
        if let Some(&tag) = self.tags.get(name) {
            return Ok(tag);
        }
        let tag = u8::try_from(self.tags.len())
            .ok()
            .and_then(Tag::new)
            .ok_or_else(|| BehaviorError::TooManyTags { name: name.to_string() })?;
        self.tags.insert(name.to_string(), tag);
        Ok(tag)
    }

    pub fn tag_set<S: AsRef<str>>(&mut self, names: &[S]) -> BehaviorResult<TagSet> {
        let mut set = TagSet::EMPTY;
        for name in names {
            set.insert(self.tag(name.as_ref())?);
        }
        Ok(set)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn action(&self, name: &str) -> Option<&Arc<dyn ActionTemplate>> {
        self.actions.get(name)
    }

    pub fn reasoner(&self, name: &str) -> Option<&Arc<dyn Reasoner>> {
        self.reasoners.get(name)
    }

    pub fn consideration(&self, name: &str) -> Option<&Arc<Consideration>> {
        self.considerations.get(name)
    }

    pub fn tag_of(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).copied()
    }

    // ── Building ──────────────────────────────────────────────────────────

    /// Resolve `def` into a behavior with a freshly allocated id.
    ///
    /// # Errors
    ///
    /// `Unknown*` for names that were never registered, plus anything
    /// [`BehaviorBuilder::build`][crate::BehaviorBuilder::build] rejects.
    pub fn build_behavior(&mut self, def: &BehaviorDef) -> BehaviorResult<Arc<Behavior>> {
        let id = BehaviorId(NEXT_BEHAVIOR.fetch_add(1, Ordering::Relaxed));
        let mut builder = Behavior::builder(id, def.name.as_str()).weight(def.weight);

        let reasoner = self
            .reasoner(&def.reasoner)
            .ok_or_else(|| BehaviorError::UnknownReasoner(def.reasoner.clone()))?;
        builder = builder.reasoner(Arc::clone(reasoner));

        if let Some(action) = &def.action {
            let template = self
                .action(action)
                .ok_or_else(|| BehaviorError::UnknownAction(action.clone()))?;
            builder = builder.shared_action(Arc::clone(template));
        }

        for r in &def.considerations {
            let consideration = self
                .consideration(&r.name)
                .ok_or_else(|| BehaviorError::UnknownConsideration(r.name.clone()))?;
            builder = builder.consideration(
                ConsiderationDecorator::new(Arc::clone(consideration))
                    .with_inverted(r.inverted)
                    .with_mute(r.mute),
            );
        }

        if !def.required_target_tags.is_empty() {
            builder = builder.with_required_tags(self.tag_set(def.required_target_tags.as_slice())?);
        } else if def.requires_target {
            builder = builder.requiring_target();
        }

        builder.build()
    }

    pub fn build_behavior_set(&mut self, def: &BehaviorSetDef) -> BehaviorResult<BehaviorSet> {
        let behaviors = def
            .behaviors
            .iter()
            .map(|b| self.build_behavior(b))
            .collect::<BehaviorResult<Vec<_>>>()?;
        Ok(BehaviorSet::new(def.name.as_str(), behaviors))
    }
}
