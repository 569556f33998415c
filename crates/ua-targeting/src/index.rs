//! R-tree backed target index.
//!
//! # Data layout
//!
//! Target metadata (tags, active flag, position) lives in a
//! `HashMap<TargetId, Target>`; the R-tree (via `rstar`) holds only
//! `[x, y]` points tagged with the `TargetId`.  Radius queries walk the tree
//! and copy the matching metadata out, so callers always receive a
//! consistent `Target` snapshot.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ua_core::{Position, TagSet, TargetId};

use crate::{Target, TargetProvider, TargetingError, TargetingResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D point with the associated `TargetId`.
#[derive(Clone, Debug, PartialEq)]
struct TargetEntry {
    point: [f32; 2],
    id:    TargetId,
}

impl TargetEntry {
    fn of(target: &Target) -> Self {
        Self { point: target.position.as_array(), id: target.id }
    }
}

impl RTreeObject for TargetEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for TargetEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── SpatialTargetIndex ────────────────────────────────────────────────────────

/// Mutable set of targets with radius search.
///
/// Construct empty with [`SpatialTargetIndex::new`] or bulk-load with
/// [`SpatialTargetIndexBuilder`].
#[derive(Default)]
pub struct SpatialTargetIndex {
    targets: HashMap<TargetId, Target>,
    tree:    RTree<TargetEntry>,
}

impl SpatialTargetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(&id)
    }

    /// Iterate all indexed targets in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> + '_ {
        self.targets.values()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a target.  Fails if a target with the same id is already indexed.
    pub fn insert(&mut self, target: Target) -> TargetingResult<()> {
        if self.targets.contains_key(&target.id) {
            return Err(TargetingError::DuplicateTarget(target.id));
        }
        self.tree.insert(TargetEntry::of(&target));
        self.targets.insert(target.id, target);
        Ok(())
    }

    /// Remove and return a target.
    pub fn remove(&mut self, id: TargetId) -> TargetingResult<Target> {
        let target = self.targets.remove(&id).ok_or(TargetingError::TargetNotFound(id))?;
        self.tree.remove(&TargetEntry::of(&target));
        Ok(target)
    }

    /// Move a target.  The R-tree entry is re-inserted only when the
    /// position actually changes.
    pub fn move_to(&mut self, id: TargetId, position: Position) -> TargetingResult<()> {
        let target = self.targets.get_mut(&id).ok_or(TargetingError::TargetNotFound(id))?;
        if target.position == position {
            return Ok(());
        }
        self.tree.remove(&TargetEntry::of(target));
        target.position = position;
        self.tree.insert(TargetEntry::of(target));
        Ok(())
    }

    pub fn set_active(&mut self, id: TargetId, active: bool) -> TargetingResult<()> {
        let target = self.targets.get_mut(&id).ok_or(TargetingError::TargetNotFound(id))?;
        target.active = active;
        Ok(())
    }

    pub fn set_tags(&mut self, id: TargetId, tags: TagSet) -> TargetingResult<()> {
        let target = self.targets.get_mut(&id).ok_or(TargetingError::TargetNotFound(id))?;
        target.tags = tags;
        Ok(())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The nearest target to `origin`, active or not.
    pub fn nearest(&self, origin: Position) -> Option<&Target> {
        self.tree
            .nearest_neighbor(&origin.as_array())
            .and_then(|e| self.targets.get(&e.id))
    }
}

impl TargetProvider for SpatialTargetIndex {
    fn search(&self, origin: Position, radius: f32) -> Vec<Target> {
        self.tree
            .locate_within_distance(origin.as_array(), radius * radius)
            .filter_map(|e| self.targets.get(&e.id).copied())
            .collect()
    }
}

// ── SpatialTargetIndexBuilder ─────────────────────────────────────────────────

/// Collect targets, then bulk-load the R-tree in one pass.
///
/// # Example
///
/// ```
/// use ua_core::{Position, TargetId};
/// use ua_targeting::{SpatialTargetIndexBuilder, Target, TargetProvider};
///
/// let mut b = SpatialTargetIndexBuilder::new();
/// b.add(Target::new(TargetId(0), Position::new(1.0, 0.0)));
/// b.add(Target::new(TargetId(1), Position::new(50.0, 0.0)));
/// let index = b.build().unwrap();
/// assert_eq!(index.search(Position::ORIGIN, 10.0).len(), 1);
/// ```
#[derive(Default)]
pub struct SpatialTargetIndexBuilder {
    targets: Vec<Target>,
}

impl SpatialTargetIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: Target) -> &mut Self {
        self.targets.push(target);
        self
    }

    /// Consume the builder.  Fails on duplicate target ids.
    ///
    /// Time complexity: O(N log N) for the R-tree bulk load.
    pub fn build(self) -> TargetingResult<SpatialTargetIndex> {
        let mut targets = HashMap::with_capacity(self.targets.len());
        for target in &self.targets {
            if targets.insert(target.id, *target).is_some() {
                return Err(TargetingError::DuplicateTarget(target.id));
            }
        }
        let entries: Vec<TargetEntry> = self.targets.iter().map(TargetEntry::of).collect();
        Ok(SpatialTargetIndex { targets, tree: RTree::bulk_load(entries) })
    }
}
