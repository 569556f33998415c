//! Per-cycle score memoization.

use rustc_hash::FxHashMap;

use ua_core::{AgentId, ConsiderationId, DataId, TargetId};

/// Identity of one consideration evaluated against one candidate.
///
/// The behavior is deliberately absent: two behaviors sharing a
/// consideration reuse each other's score for the same (target, data).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub agent:         AgentId,
    pub target:        Option<TargetId>,
    pub data:          Option<DataId>,
    pub consideration: ConsiderationId,
}

/// Clamped raw scores of the current decision cycle.
///
/// Owned by one agent and cleared at the start of every cycle, so entries
/// never outlive the world state they were computed from.
#[derive(Default, Debug)]
pub struct ScoreCache {
    scores: FxHashMap<ScoreKey, f32>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &ScoreKey) -> Option<f32> {
        self.scores.get(key).copied()
    }

    /// Store `score`, replacing any earlier value for `key`.
    #[inline]
    pub fn insert(&mut self, key: ScoreKey, score: f32) {
        self.scores.insert(key, score);
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
