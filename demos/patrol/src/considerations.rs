//! Guard considerations, registered by the names the behavior JSON uses.

use ua_behavior::{
    BehaviorResult, Consideration, CurveScorer, Decision, DecisionContext, Registry, ResponseCurve,
};

use crate::actions::{MAX_STAMINA, Stamina};

/// Register `always`, `stamina` and `intruder_close`.
///
/// `sight` is the distance at which an intruder stops mattering.
pub fn register(registry: &mut Registry, idle_score: f32, sight: f32) -> BehaviorResult<()> {
    let id = registry.next_consideration_id();
    registry.register_consideration(Consideration::from_fn(id, "always", move |_, _| idle_score))?;

    let id = registry.next_consideration_id();
    let stamina = CurveScorer::new(
        |_: &Decision, ctx: &DecisionContext<'_>| ctx.blackboard.get::<Stamina>().map(|s| s.0),
        0.0,
        MAX_STAMINA,
        ResponseCurve::Logistic { steepness: 10.0, midpoint: 0.3 },
    );
    registry.register_consideration(Consideration::leaf(id, "stamina", stamina).with_priority(1))?;

    // Closer is better: 1 at distance zero, 0 at the edge of sight.
    let id = registry.next_consideration_id();
    let close = CurveScorer::new(
        |d: &Decision, ctx: &DecisionContext<'_>| d.target().map(|t| t.distance_from(ctx.position)),
        0.0,
        sight,
        ResponseCurve::Linear { slope: -1.0, intercept: 1.0 },
    );
    registry.register_consideration(
        Consideration::leaf(id, "intruder_close", close).requiring_target(),
    )?;
    Ok(())
}
