//! The `TargetProvider` contract.

use ua_core::Position;

use crate::Target;

/// Supplies candidate targets around an agent.
///
/// Implementations return every target whose position lies within `radius`
/// of `origin`, in any order and regardless of the `active` flag.  Agents
/// filter, sort by distance, and truncate the result themselves.
///
/// Implementations must be `Sync` so one provider can be shared by agents
/// stepped in parallel.
pub trait TargetProvider: Sync {
    fn search(&self, origin: Position, radius: f32) -> Vec<Target>;
}

/// Brute-force provider over a plain list.  Fine for tests and small worlds.
impl TargetProvider for [Target] {
    fn search(&self, origin: Position, radius: f32) -> Vec<Target> {
        let r2 = radius * radius;
        self.iter()
            .filter(|t| t.position.distance_sq(origin) <= r2)
            .copied()
            .collect()
    }
}

impl TargetProvider for Vec<Target> {
    fn search(&self, origin: Position, radius: f32) -> Vec<Target> {
        self.as_slice().search(origin, radius)
    }
}

/// A provider that never finds anything.
impl TargetProvider for () {
    fn search(&self, _origin: Position, _radius: f32) -> Vec<Target> {
        Vec::new()
    }
}
