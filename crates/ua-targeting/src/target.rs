//! The target handle passed around the decision engine.

use ua_core::{Position, Tag, TagSet, TargetId};

/// A candidate target as seen by one decision cycle.
///
/// `Target` is a `Copy` snapshot: decisions hold their own copy, so a target
/// moving or being deactivated mid-cycle never changes a score already
/// computed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Target {
    pub id:       TargetId,
    pub tags:     TagSet,
    pub position: Position,
    /// Inactive targets are returned by providers but dropped by agents
    /// before candidate generation.
    pub active:   bool,
}

impl Target {
    /// An active, untagged target at `position`.
    pub fn new(id: TargetId, position: Position) -> Self {
        Self { id, tags: TagSet::EMPTY, position, active: true }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// `true` if this target carries every tag in `required`.
    #[inline]
    pub fn has_tags(&self, required: TagSet) -> bool {
        self.tags.contains_all(required)
    }

    #[inline]
    pub fn distance_from(&self, origin: Position) -> f32 {
        self.position.distance(origin)
    }
}
