//! Reasoners expand one behavior into the decision candidates of a cycle.
//!
//! | Reasoner               | Candidates                                              |
//! |------------------------|---------------------------------------------------------|
//! | [`DefaultReasoner`]    | per accepted target if the behavior requires one, else one untargeted |
//! | [`PerTargetReasoner`]  | one per accepted target                                 |
//! | [`UntargetedReasoner`] | exactly one, without target                             |
//! | [`DataReasoner`]       | one per data item (× accepted targets if required)      |

use std::sync::Arc;

use ua_targeting::Target;

use crate::{Behavior, Decision, DecisionContext, DecisionData};

pub trait Reasoner: Send + Sync {
    /// `targets` are the cycle's active targets, nearest first.
    fn build_decisions(
        &self,
        ctx:      &DecisionContext<'_>,
        behavior: &Arc<Behavior>,
        targets:  &[Target],
    ) -> Vec<Decision>;
}

fn per_target(ctx: &DecisionContext<'_>, behavior: &Arc<Behavior>, targets: &[Target]) -> Vec<Decision> {
    targets
        .iter()
        .filter(|t| behavior.accepts_target(t))
        .map(|t| Decision::new(ctx.agent, Arc::clone(behavior)).with_target(*t))
        .collect()
}

// ── Built-ins ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultReasoner;

impl Reasoner for DefaultReasoner {
    fn build_decisions(
        &self,
        ctx:      &DecisionContext<'_>,
        behavior: &Arc<Behavior>,
        targets:  &[Target],
    ) -> Vec<Decision> {
        if behavior.requires_target() {
            per_target(ctx, behavior, targets)
        } else {
            vec![Decision::new(ctx.agent, Arc::clone(behavior))]
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct PerTargetReasoner;

impl Reasoner for PerTargetReasoner {
    fn build_decisions(
        &self,
        ctx:      &DecisionContext<'_>,
        behavior: &Arc<Behavior>,
        targets:  &[Target],
    ) -> Vec<Decision> {
        per_target(ctx, behavior, targets)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct UntargetedReasoner;

impl Reasoner for UntargetedReasoner {
    fn build_decisions(
        &self,
        ctx:      &DecisionContext<'_>,
        behavior: &Arc<Behavior>,
        _targets: &[Target],
    ) -> Vec<Decision> {
        vec![Decision::new(ctx.agent, Arc::clone(behavior))]
    }
}

/// One decision per payload produced by a closure.
///
/// Behaviors requiring a target get the cross product of payloads and
/// accepted targets, payload-major.
pub struct DataReasoner<F> {
    source: F,
}

impl<F> DataReasoner<F>
where
    F: Fn(&DecisionContext<'_>, &Behavior) -> Vec<DecisionData> + Send + Sync,
{
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F> Reasoner for DataReasoner<F>
where
    F: Fn(&DecisionContext<'_>, &Behavior) -> Vec<DecisionData> + Send + Sync,
{
    fn build_decisions(
        &self,
        ctx:      &DecisionContext<'_>,
        behavior: &Arc<Behavior>,
        targets:  &[Target],
    ) -> Vec<Decision> {
        let payloads = (self.source)(ctx, behavior.as_ref());
        if !behavior.requires_target() {
            return payloads
                .into_iter()
                .map(|d| Decision::new(ctx.agent, Arc::clone(behavior)).with_data(d))
                .collect();
        }
        let accepted: Vec<&Target> = targets.iter().filter(|t| behavior.accepts_target(t)).collect();
        let mut out = Vec::with_capacity(payloads.len() * accepted.len());
        for data in &payloads {
            for target in &accepted {
                out.push(
                    Decision::new(ctx.agent, Arc::clone(behavior))
                        .with_target(**target)
                        .with_data(data.clone()),
                );
            }
        }
        out
    }
}
