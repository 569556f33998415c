//! Per-cycle inspection records.

use std::cmp::Ordering;

use ua_behavior::Decision;

/// One candidate of the last decision cycle, as the agent saw it.
#[derive(Clone, Debug)]
pub struct DecisionResult {
    pub decision:         Decision,
    /// The candidate that won the cycle.
    pub best:             bool,
    /// Similar to the decision that was running when the cycle started.
    pub is_same_decision: bool,
}

/// Results ordered for display: the winner first, then scored before
/// unscored, non-skipped before skipped, and finally by descending score.
pub fn sorted_for_inspection(results: &[DecisionResult]) -> Vec<&DecisionResult> {
    let mut sorted: Vec<&DecisionResult> = results.iter().collect();
    sorted.sort_by(|a, b| {
        b.best
            .cmp(&a.best)
            .then_with(|| b.decision.is_scored().cmp(&a.decision.is_scored()))
            .then_with(|| a.decision.is_skipped().cmp(&b.decision.is_skipped()))
            .then_with(|| {
                b.decision
                    .score()
                    .partial_cmp(&a.decision.score())
                    .unwrap_or(Ordering::Equal)
            })
    });
    sorted
}
