//! Unit tests for ua-behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ua_blackboard::Blackboard;
use ua_core::{AgentId, AgentRng, BehaviorId, ConsiderationId, DataId, Position, Tag, TagSet, TargetId};
use ua_targeting::Target;

use crate::{
    Action, ActionContext, ActionError, ActionRunner, ActionState, ActionTemplate, Behavior,
    BehaviorError, Consideration, ConsiderationDecorator, Decision, DecisionContext, DecisionData,
    ScoreCache,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const AGENT: AgentId = AgentId(0);

fn constant(id: u32, score: f32) -> Consideration {
    Consideration::from_fn(ConsiderationId(id), format!("c{id}"), move |_, _| score)
}

/// A constant consideration that counts its evaluations.
fn counted(id: u32, score: f32, calls: &Arc<AtomicUsize>) -> Consideration {
    let calls = Arc::clone(calls);
    Consideration::from_fn(ConsiderationId(id), format!("counted{id}"), move |_, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        score
    })
}

fn behavior_of(id: u32, weight: f32, considerations: Vec<ConsiderationDecorator>) -> Arc<Behavior> {
    let mut builder = Behavior::builder(BehaviorId(id), format!("b{id}")).weight(weight);
    for c in considerations {
        builder = builder.consideration(c);
    }
    builder.build().unwrap()
}

fn deco(c: Consideration) -> ConsiderationDecorator {
    ConsiderationDecorator::new(Arc::new(c))
}

fn target(id: u32) -> Target {
    Target::new(TargetId(id), Position::new(id as f32, 0.0))
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Consideration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod consideration {
    use super::*;

    #[test]
    fn clamps_into_unit_range() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let b = behavior_of(0, 1.0, vec![deco(constant(0, 1.0))]);
        let d = Decision::new(AGENT, b);

        assert_eq!(constant(1, 3.5).evaluate(&d, &ctx), 1.0);
        assert_eq!(constant(2, -0.4).evaluate(&d, &ctx), 0.0);
        assert_eq!(constant(3, f32::NAN).evaluate(&d, &ctx), 0.0);
        assert_eq!(constant(4, 0.25).evaluate(&d, &ctx), 0.25);
    }

    #[test]
    fn opt_out_without_target_skips_scorer() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = counted(0, 1.0, &calls).requiring_target();
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));

        assert_eq!(c.evaluate(&d, &ctx), 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn opt_out_on_missing_tag() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let hostile = Tag::new(3).unwrap();
        let c = constant(0, 0.7).with_required_tags(TagSet::new().with(hostile));
        let b = behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]);

        let untagged = Decision::new(AGENT, Arc::clone(&b)).with_target(target(1));
        let tagged = Decision::new(AGENT, b).with_target(target(2).with_tag(hostile));

        assert_eq!(c.evaluate(&untagged, &ctx), 0.0);
        assert_eq!(c.evaluate(&tagged, &ctx), 0.7);
    }

    #[test]
    fn composite_is_multiplicative() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));

        let both = Consideration::composite(
            ConsiderationId(10),
            "both",
            vec![Arc::new(constant(0, 0.5)), Arc::new(constant(1, 0.4))],
        );
        assert!(approx(both.evaluate(&d, &ctx), 0.2));

        let vetoed = Consideration::composite(
            ConsiderationId(11),
            "vetoed",
            vec![Arc::new(constant(0, 0.9)), Arc::new(constant(1, 0.0))],
        );
        assert_eq!(vetoed.evaluate(&d, &ctx), 0.0);
        assert_eq!(vetoed.children().map(|c| c.len()), Some(2));
        assert!(constant(2, 1.0).children().is_none());
    }

    #[test]
    fn composite_cacheable_only_if_all_children_are() {
        let cached = Consideration::composite(
            ConsiderationId(10),
            "cached",
            vec![Arc::new(constant(0, 1.0)), Arc::new(constant(1, 1.0))],
        );
        assert!(cached.should_cache_score());

        let volatile = Consideration::composite(
            ConsiderationId(11),
            "volatile",
            vec![Arc::new(constant(0, 1.0)), Arc::new(constant(1, 1.0).with_cache(false))],
        );
        assert!(!volatile.should_cache_score());
    }
}

// ── Scorers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scorers {
    use super::*;
    use crate::{BoolScorer, CurveScorer, ResponseCurve, in_range};

    struct Stamina(f32);

    #[test]
    fn bool_scorer() {
        let bb = Blackboard::new().with(Stamina(1.0));
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));

        let has = Consideration::leaf(
            ConsiderationId(0),
            "has stamina",
            BoolScorer::new(|_: &Decision, ctx: &DecisionContext<'_>| ctx.blackboard.contains::<Stamina>()),
        );
        let lacks = Consideration::leaf(
            ConsiderationId(1),
            "no target",
            BoolScorer::new(|d: &Decision, _: &DecisionContext<'_>| d.target().is_some()),
        );
        assert_eq!(has.evaluate(&d, &ctx), 1.0);
        assert_eq!(lacks.evaluate(&d, &ctx), 0.0);
    }

    #[test]
    fn curve_normalizes_input() {
        let bb = Blackboard::new().with(Stamina(75.0));
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));

        let scorer = CurveScorer::new(
            |_: &Decision, ctx: &DecisionContext<'_>| ctx.blackboard.get::<Stamina>().map(|s| s.0),
            50.0,
            100.0,
            ResponseCurve::IDENTITY,
        );
        let c = Consideration::leaf(ConsiderationId(0), "stamina", scorer);
        assert!(approx(c.evaluate(&d, &ctx), 0.5));
    }

    #[test]
    fn curve_missing_input_opts_out() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));

        let scorer = CurveScorer::new(
            |_: &Decision, ctx: &DecisionContext<'_>| ctx.blackboard.get::<Stamina>().map(|s| s.0),
            0.0,
            1.0,
            ResponseCurve::Linear { slope: -1.0, intercept: 1.0 },
        );
        let c = Consideration::leaf(ConsiderationId(0), "stamina", scorer);
        assert_eq!(c.evaluate(&d, &ctx), 0.0);
    }

    #[test]
    fn response_curves() {
        assert!(approx(ResponseCurve::Polynomial { exponent: 2.0 }.apply(0.5), 0.25));
        assert!(approx(ResponseCurve::Logistic { steepness: 10.0, midpoint: 0.5 }.apply(0.5), 0.5));
        assert_eq!(ResponseCurve::Step { threshold: 0.3 }.apply(0.2), 0.0);
        assert_eq!(ResponseCurve::Step { threshold: 0.3 }.apply(0.3), 1.0);
        assert!(approx(ResponseCurve::Linear { slope: -1.0, intercept: 1.0 }.apply(0.25), 0.75));
    }

    #[test]
    fn in_range_checks_target_distance() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let b = behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]);
        let c = Consideration::leaf(ConsiderationId(0), "close", in_range(5.0));

        let near = Decision::new(AGENT, Arc::clone(&b)).with_target(target(3));
        let far = Decision::new(AGENT, Arc::clone(&b)).with_target(target(8));
        let none = Decision::new(AGENT, b);
        assert_eq!(c.evaluate(&near, &ctx), 1.0);
        assert_eq!(c.evaluate(&far, &ctx), 0.0);
        assert_eq!(c.evaluate(&none, &ctx), 0.0);
    }
}

// ── Decorator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decorator {
    use super::*;

    #[test]
    fn invert_and_mute() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let d = Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(9, 1.0))]));
        let shared = Arc::new(constant(0, 0.3));

        let plain = ConsiderationDecorator::new(Arc::clone(&shared));
        let inverted = ConsiderationDecorator::new(Arc::clone(&shared)).with_inverted(true);
        let muted = ConsiderationDecorator::new(Arc::clone(&shared)).with_mute(true).with_inverted(true);

        assert!(approx(plain.evaluate(&d, &ctx), 0.3));
        assert!(approx(inverted.evaluate(&d, &ctx), 0.7));
        assert_eq!(muted.evaluate(&d, &ctx), 1.0);
    }

    #[test]
    fn delegates_settings() {
        let inner = Arc::new(constant(0, 1.0).with_priority(7).with_cache(false).requiring_target());
        let d = ConsiderationDecorator::new(inner).with_inverted(true);
        assert_eq!(d.priority(), 7);
        assert!(!d.should_cache_score());
        assert!(d.requires_target());
        assert_eq!(d.name(), "Not c0");
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decision {
    use super::*;

    #[test]
    fn compensation_takes_nth_root() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let b = behavior_of(0, 1.0, vec![deco(constant(0, 0.5)), deco(constant(1, 0.8))]);
        let mut d = Decision::new(AGENT, b);

        let score = d.evaluate(0.0, 1.0, &mut ScoreCache::new(), &ctx);
        assert!(approx(score, 0.4_f32.sqrt()));
        assert!(d.is_scored());
        assert!(!d.is_skipped());
        assert_eq!(d.score(), score);
    }

    #[test]
    fn weight_and_bonus_scale_the_score() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let b = behavior_of(0, 2.0, vec![deco(constant(0, 0.5))]);
        let mut d = Decision::new(AGENT, b);

        assert!(approx(d.evaluate(0.0, 1.25, &mut ScoreCache::new(), &ctx), 1.25));
        assert_eq!(d.max_score(), 2.0);
    }

    #[test]
    fn zero_stops_evaluation() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let b = behavior_of(
            0,
            1.0,
            vec![deco(constant(0, 0.0).with_priority(10)), deco(counted(1, 1.0, &calls))],
        );
        let mut d = Decision::new(AGENT, b);

        assert_eq!(d.evaluate(0.0, 1.0, &mut ScoreCache::new(), &ctx), 0.0);
        assert!(d.is_skipped());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn threshold_prunes_remaining_considerations() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let b = behavior_of(
            0,
            1.0,
            vec![deco(constant(0, 0.5).with_priority(1)), deco(counted(1, 1.0, &calls))],
        );
        let mut d = Decision::new(AGENT, b);

        // After 0.5 the projection is sqrt(0.5) ≈ 0.707 < 0.9.
        d.evaluate(0.9, 1.0, &mut ScoreCache::new(), &ctx);
        assert!(d.is_skipped());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_consideration_pruned_when_weight_below_threshold() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let b = behavior_of(0, 0.5, vec![deco(counted(0, 1.0, &calls))]);
        let mut d = Decision::new(AGENT, b);

        d.evaluate(0.8, 1.0, &mut ScoreCache::new(), &ctx);
        assert!(d.is_skipped());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn higher_priority_runs_first() {
        let b = behavior_of(
            0,
            1.0,
            vec![
                deco(constant(0, 1.0).with_priority(1)),
                deco(constant(1, 1.0).with_priority(5)),
                deco(constant(2, 1.0).with_priority(1)),
            ],
        );
        let order: Vec<_> = b.considerations().iter().map(|c| c.consideration().id()).collect();
        assert_eq!(order, vec![ConsiderationId(1), ConsiderationId(0), ConsiderationId(2)]);
    }

    #[test]
    fn shared_consideration_is_cached_across_behaviors() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = Arc::new(counted(0, 0.3, &calls));

        let a = behavior_of(0, 1.0, vec![ConsiderationDecorator::new(Arc::clone(&shared))]);
        let b = behavior_of(1, 1.0, vec![ConsiderationDecorator::new(shared).with_inverted(true)]);
        let mut cache = ScoreCache::new();

        let sa = Decision::new(AGENT, a).evaluate(0.0, 1.0, &mut cache, &ctx);
        let sb = Decision::new(AGENT, b).evaluate(0.0, 1.0, &mut cache, &ctx);
        assert!(approx(sa, 0.3));
        assert!(approx(sb, 0.7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn uncacheable_is_re_evaluated_but_stored() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = Arc::new(counted(0, 0.6, &calls).with_cache(false));

        let a = behavior_of(0, 1.0, vec![ConsiderationDecorator::new(Arc::clone(&shared))]);
        let b = behavior_of(1, 1.0, vec![ConsiderationDecorator::new(Arc::clone(&shared))]);
        let mut cache = ScoreCache::new();

        let mut da = Decision::new(AGENT, a);
        da.evaluate(0.0, 1.0, &mut cache, &ctx);
        Decision::new(AGENT, b).evaluate(0.0, 1.0, &mut cache, &ctx);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&da.score_key(shared.id())), Some(0.6));
    }

    #[test]
    fn cache_keys_include_target() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let b = behavior_of(0, 1.0, vec![deco(counted(0, 1.0, &calls))]);
        let mut cache = ScoreCache::new();

        Decision::new(AGENT, Arc::clone(&b)).with_target(target(1)).evaluate(0.0, 1.0, &mut cache, &ctx);
        Decision::new(AGENT, b).with_target(target(2)).evaluate(0.0, 1.0, &mut cache, &ctx);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn muted_bypasses_cache() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let b = behavior_of(0, 1.0, vec![deco(counted(0, 0.1, &calls)).with_mute(true)]);
        let mut cache = ScoreCache::new();

        let score = Decision::new(AGENT, b).evaluate(0.0, 1.0, &mut cache, &ctx);
        assert_eq!(score, 1.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn two_behavior_example_picks_higher_compensated_score() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let a = behavior_of(0, 1.0, vec![deco(constant(0, 0.5)), deco(constant(1, 0.8))]);
        let b = behavior_of(1, 1.0, vec![deco(constant(2, 0.9))]);
        let mut cache = ScoreCache::new();

        let sa = Decision::new(AGENT, a).evaluate(0.0, 1.0, &mut cache, &ctx);
        let mut db = Decision::new(AGENT, b);
        let sb = db.evaluate(sa, 1.0, &mut cache, &ctx);
        assert!(approx(sa, 0.632_455_5));
        assert!(approx(sb, 0.9));
        assert!(!db.is_skipped());
        assert!(sb > sa);
    }

    #[test]
    fn similarity_ignores_scores() {
        let b = behavior_of(0, 1.0, vec![deco(constant(0, 1.0))]);
        let other = behavior_of(1, 1.0, vec![deco(constant(0, 1.0))]);

        let mut x = Decision::new(AGENT, Arc::clone(&b)).with_target(target(1));
        let y = Decision::new(AGENT, Arc::clone(&b)).with_target(target(1));
        x.mark_concluded();
        assert!(x.is_similar(&y));

        assert!(!x.is_similar(&Decision::new(AGENT, Arc::clone(&b)).with_target(target(2))));
        assert!(!x.is_similar(&Decision::new(AgentId(1), Arc::clone(&b)).with_target(target(1))));
        assert!(!x.is_similar(&Decision::new(AGENT, other).with_target(target(1))));
        assert!(
            !Decision::new(AGENT, Arc::clone(&b))
                .with_data(DecisionData::new(DataId(0), 1u8))
                .is_similar(&Decision::new(AGENT, b).with_data(DecisionData::new(DataId(1), 1u8)))
        );
    }

    #[test]
    fn similarity_requires_the_same_behavior_instance() {
        let a = behavior_of(7, 1.0, vec![deco(constant(0, 0.2))]);
        let b = behavior_of(7, 1.0, vec![deco(constant(1, 0.9))]);
        assert_eq!(a.id(), b.id());

        let x = Decision::new(AGENT, Arc::clone(&a));
        assert!(x.is_similar(&Decision::new(AGENT, Arc::clone(&a))));
        assert!(!x.is_similar(&Decision::new(AGENT, b)));
    }

    #[test]
    fn typed_data_access() {
        let b = behavior_of(0, 1.0, vec![deco(constant(0, 1.0))]);
        let d = Decision::new(AGENT, b).with_data(DecisionData::new(DataId(4), String::from("ammo")));
        assert_eq!(d.data::<String>().map(String::as_str), Some("ammo"));
        assert!(d.data::<u32>().is_none());
        assert_eq!(d.data_id(), Some(DataId(4)));
    }
}

// ── Behavior ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod behavior {
    use super::*;

    #[test]
    fn rejects_empty_considerations() {
        let err = Behavior::builder(BehaviorId(0), "empty").build().unwrap_err();
        assert!(matches!(err, BehaviorError::NoConsiderations(name) if name == "empty"));
    }

    #[test]
    fn rejects_bad_weight() {
        for weight in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = Behavior::builder(BehaviorId(0), "w")
                .consideration(constant(0, 1.0))
                .weight(weight)
                .build()
                .unwrap_err();
            assert!(matches!(err, BehaviorError::InvalidWeight { .. }));
        }
    }

    #[test]
    fn required_tags_imply_target() {
        let b = Behavior::builder(BehaviorId(0), "t")
            .consideration(constant(0, 1.0))
            .with_required_tags(TagSet::new().with(Tag::new(1).unwrap()))
            .build()
            .unwrap();
        assert!(b.requires_target());
        assert!(b.accepts_target(&target(0).with_tag(Tag::new(1).unwrap())));
        assert!(!b.accepts_target(&target(0)));
    }
}

// ── Reasoners ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reasoner {
    use super::*;
    use crate::{DataReasoner, PerTargetReasoner};

    #[test]
    fn default_untargeted_yields_one() {
        let bb = Blackboard::new();
        let targets = [target(1), target(2)];
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &targets);
        let b = behavior_of(0, 1.0, vec![deco(constant(0, 1.0))]);

        let ds = b.build_decisions(&ctx, &targets);
        assert_eq!(ds.len(), 1);
        assert!(ds[0].target().is_none());
    }

    #[test]
    fn default_targeted_filters_by_tags() {
        let bb = Blackboard::new();
        let enemy = Tag::new(2).unwrap();
        let targets = [target(1).with_tag(enemy), target(2), target(3).with_tag(enemy)];
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &targets);
        let b = Behavior::builder(BehaviorId(0), "attack")
            .consideration(constant(0, 1.0))
            .with_required_tags(TagSet::new().with(enemy))
            .build()
            .unwrap();

        let ids: Vec<_> = b.build_decisions(&ctx, &targets).iter().filter_map(Decision::target_id).collect();
        assert_eq!(ids, vec![TargetId(1), TargetId(3)]);
    }

    #[test]
    fn per_target_with_no_targets_is_empty() {
        let bb = Blackboard::new();
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &[]);
        let b = Behavior::builder(BehaviorId(0), "x")
            .consideration(constant(0, 1.0))
            .reasoner(Arc::new(PerTargetReasoner))
            .build()
            .unwrap();
        assert!(b.build_decisions(&ctx, &[]).is_empty());
    }

    #[test]
    fn data_reasoner_crosses_payloads_and_targets() {
        let bb = Blackboard::new();
        let targets = [target(1), target(2)];
        let ctx = DecisionContext::new(AGENT, Position::ORIGIN, &bb, &targets);
        let reasoner = DataReasoner::new(|_: &DecisionContext<'_>, _: &Behavior| {
            vec![DecisionData::new(DataId(0), "sword"), DecisionData::new(DataId(1), "bow")]
        });
        let b = Behavior::builder(BehaviorId(0), "equip")
            .consideration(constant(0, 1.0))
            .reasoner(Arc::new(reasoner))
            .requiring_target()
            .build()
            .unwrap();

        let ds = b.build_decisions(&ctx, &targets);
        assert_eq!(ds.len(), 4);
        assert_eq!(ds[1].data::<&str>(), Some(&"sword"));
        assert_eq!(ds[1].target_id(), Some(TargetId(2)));
    }
}

// ── Action lifecycle ──────────────────────────────────────────────────────────

#[cfg(test)]
mod action {
    use super::*;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    #[derive(Clone)]
    struct Probe {
        log:            Log,
        enter_ok:       bool,
        exit_after:     Option<usize>,
        conclude_after: Option<usize>,
        updates:        usize,
    }

    impl Probe {
        fn new(log: &Log) -> Self {
            Self { log: Arc::clone(log), enter_ok: true, exit_after: None, conclude_after: None, updates: 0 }
        }

        fn push(&self, event: &'static str) {
            self.log.lock().unwrap().push(event);
        }
    }

    impl Action for Probe {
        fn on_enter(&mut self, _ctx: &mut ActionContext<'_>) -> bool {
            self.push("enter");
            self.enter_ok
        }

        fn on_update(&mut self, ctx: &mut ActionContext<'_>, _dt: f32) {
            self.push("update");
            self.updates += 1;
            if self.conclude_after == Some(self.updates) {
                ctx.conclude();
            }
        }

        fn on_fixed_update(&mut self, _ctx: &mut ActionContext<'_>, _dt: f32) {
            self.push("fixed");
        }

        fn on_exit(&mut self, _ctx: &mut ActionContext<'_>) {
            self.push("exit");
        }

        fn should_exit(&self, _ctx: &ActionContext<'_>) -> bool {
            self.exit_after.is_some_and(|n| self.updates >= n)
        }
    }

    struct Rig {
        decision:   Decision,
        position:   Position,
        blackboard: Blackboard,
        rng:        AgentRng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                decision:   Decision::new(AGENT, behavior_of(0, 1.0, vec![deco(constant(0, 1.0))])),
                position:   Position::ORIGIN,
                blackboard: Blackboard::new(),
                rng:        AgentRng::new(0, AGENT),
            }
        }

        fn ctx(&mut self) -> ActionContext<'_> {
            ActionContext::new(&self.decision, &mut self.position, &mut self.blackboard, &mut self.rng)
        }
    }

    fn events(log: &Log) -> Vec<&'static str> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn execute_twice_fails() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut runner = ActionRunner::new(Box::new(Probe::new(&log)));

        assert_eq!(runner.execute(&mut rig.ctx()), Ok(true));
        assert_eq!(runner.state(), ActionState::Running);
        assert!(matches!(runner.execute(&mut rig.ctx()), Err(ActionError::AlreadyExecuted(_))));
    }

    #[test]
    fn failed_entry_concludes_without_running() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut probe = Probe::new(&log);
        probe.enter_ok = false;
        let mut runner = ActionRunner::new(Box::new(probe));

        assert_eq!(runner.execute(&mut rig.ctx()), Ok(false));
        assert!(runner.is_concluded());
        assert!(!runner.update(0.1, &mut rig.ctx()));
        assert_eq!(events(&log), vec!["enter", "exit"]);
    }

    #[test]
    fn should_exit_concludes_before_update() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut probe = Probe::new(&log);
        probe.exit_after = Some(2);
        let mut runner = ActionRunner::new(Box::new(probe));

        runner.execute(&mut rig.ctx()).unwrap();
        assert!(!runner.update(0.1, &mut rig.ctx()));
        assert!(!runner.update(0.1, &mut rig.ctx()));
        assert!(runner.update(0.1, &mut rig.ctx()));
        assert!(runner.is_concluded());
        assert_eq!(events(&log), vec!["enter", "update", "update", "exit"]);
    }

    #[test]
    fn context_conclusion_ends_action() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut probe = Probe::new(&log);
        probe.conclude_after = Some(1);
        let mut runner = ActionRunner::new(Box::new(probe));

        runner.execute(&mut rig.ctx()).unwrap();
        assert!(runner.update(0.1, &mut rig.ctx()));
        assert_eq!(events(&log), vec!["enter", "update", "exit"]);
    }

    #[test]
    fn interrupt_exits_once() {
        let log = Log::default();
        let mut rig = Rig::new();
        let mut runner = ActionRunner::new(Box::new(Probe::new(&log)));

        assert!(!runner.interrupt(&mut rig.ctx()));
        runner.execute(&mut rig.ctx()).unwrap();
        runner.fixed_update(0.02, &mut rig.ctx());
        assert!(runner.interrupt(&mut rig.ctx()));
        assert!(!runner.interrupt(&mut rig.ctx()));
        assert_eq!(events(&log), vec!["enter", "fixed", "exit"]);
    }

    #[test]
    fn templates_produce_fresh_instances() {
        let log = Log::default();
        let template: Arc<dyn ActionTemplate> = Arc::new(Probe::new(&log));
        let mut rig = Rig::new();

        let mut first = ActionRunner::new(template.instantiate());
        first.execute(&mut rig.ctx()).unwrap();
        first.interrupt(&mut rig.ctx());

        let mut second = ActionRunner::new(template.instantiate());
        assert_eq!(second.state(), ActionState::Created);
        assert_eq!(second.execute(&mut rig.ctx()), Ok(true));
    }

    #[test]
    fn context_exposes_state() {
        let mut rig = Rig::new();
        rig.blackboard.insert(5u32);
        let mut ctx = rig.ctx();
        *ctx.position = Position::new(2.0, 3.0);
        if let Some(n) = ctx.blackboard.get_mut::<u32>() {
            *n += 1;
        }
        assert!(ctx.target().is_none());
        drop(ctx);
        assert_eq!(rig.position, Position::new(2.0, 3.0));
        assert_eq!(rig.blackboard.get::<u32>(), Some(&6));
    }
}

// ── Registry + loader ─────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use super::*;
    use crate::{Registry, load_behavior_set, load_behavior_set_reader, load_behaviors_json};

    #[derive(Clone)]
    struct Idle;
    impl Action for Idle {}

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.register_action("idle", Idle);
        let always = r.next_consideration_id();
        r.register_consideration(Consideration::from_fn(always, "always", |_, _| 1.0)).unwrap();
        let half = r.next_consideration_id();
        r.register_consideration(Consideration::from_fn(half, "half", |_, _| 0.5)).unwrap();
        r
    }

    const SET: &str = r#"{
        "name": "guard",
        "behaviors": [
            {
                "name": "Chase",
                "action": "idle",
                "weight": 2.0,
                "required_target_tags": ["intruder"],
                "considerations": [{ "name": "half", "inverted": true }, { "name": "always" }]
            },
            { "name": "Rest", "considerations": [{ "name": "half", "mute": true }] }
        ]
    }"#;

    #[test]
    fn loads_set_from_reader() {
        let mut r = registry();
        let set = load_behavior_set_reader(SET.as_bytes(), &mut r).unwrap();

        assert_eq!(set.name, "guard");
        assert_eq!(set.len(), 2);
        let chase = &set.behaviors[0];
        assert_eq!(chase.weight(), 2.0);
        assert!(chase.has_action());
        assert!(chase.requires_target());
        assert!(chase.considerations()[0].is_inverted());
        assert_eq!(r.tag_of("intruder"), Some(Tag::new(0).unwrap()));

        let rest = &set.behaviors[1];
        assert_ne!(chase.id(), rest.id());
        assert!(!rest.has_action());
        assert!(rest.considerations()[0].is_muted());
    }

    #[test]
    fn loads_set_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SET.as_bytes()).unwrap();
        let mut r = registry();
        let set = load_behavior_set(file.path(), &mut r).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn loads_bare_list() {
        let mut r = registry();
        let json = r#"[{ "name": "A", "considerations": [{ "name": "always" }] }]"#;
        let behaviors = load_behaviors_json(json.as_bytes(), &mut r).unwrap();
        assert_eq!(behaviors.len(), 1);
        assert_eq!(behaviors[0].weight(), 1.0);
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut r = registry();
        let bad_consideration = r#"[{ "name": "A", "considerations": [{ "name": "nope" }] }]"#;
        assert!(matches!(
            load_behaviors_json(bad_consideration.as_bytes(), &mut r),
            Err(BehaviorError::UnknownConsideration(n)) if n == "nope"
        ));

        let bad_action = r#"[{ "name": "A", "action": "fly", "considerations": [{ "name": "always" }] }]"#;
        assert!(matches!(
            load_behaviors_json(bad_action.as_bytes(), &mut r),
            Err(BehaviorError::UnknownAction(_))
        ));

        let bad_reasoner = r#"[{ "name": "A", "reasoner": "oracle", "considerations": [{ "name": "always" }] }]"#;
        assert!(matches!(
            load_behaviors_json(bad_reasoner.as_bytes(), &mut r),
            Err(BehaviorError::UnknownReasoner(_))
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut r = registry();
        assert!(matches!(load_behaviors_json("[{".as_bytes(), &mut r), Err(BehaviorError::Parse(_))));
    }

    #[test]
    fn duplicate_consideration_names_and_ids_are_rejected() {
        let mut r = registry();
        let always = r.consideration("always").unwrap().id();
        let id = r.next_consideration_id();
        assert!(matches!(
            r.register_consideration(Consideration::from_fn(id, "always", |_, _| 0.1)),
            Err(BehaviorError::DuplicateConsideration(n)) if n == "always"
        ));

        let taken = r.consideration("half").unwrap().id();
        assert!(matches!(
            r.register_consideration(Consideration::from_fn(taken, "other", |_, _| 0.1)),
            Err(BehaviorError::DuplicateConsiderationId(i)) if i == taken
        ));
        // The original entries are untouched.
        assert_eq!(r.consideration("always").unwrap().id(), always);
        assert!(r.consideration("other").is_none());
    }

    #[test]
    fn ids_are_unique_across_registries() {
        let mut first = registry();
        let mut second = registry();
        assert_ne!(
            first.consideration("always").unwrap().id(),
            second.consideration("always").unwrap().id()
        );

        let json = r#"[{ "name": "A", "considerations": [{ "name": "always" }] }]"#;
        let a = load_behaviors_json(json.as_bytes(), &mut first).unwrap();
        let b = load_behaviors_json(json.as_bytes(), &mut second).unwrap();
        assert_ne!(a[0].id(), b[0].id());
    }

    #[test]
    fn tag_space_is_bounded() {
        let mut r = Registry::new();
        for i in 0..Tag::MAX {
            r.tag(&format!("t{i}")).unwrap();
        }
        assert_eq!(r.tag("t0").unwrap(), Tag::new(0).unwrap());
        assert!(matches!(r.tag("overflow"), Err(BehaviorError::TooManyTags { .. })));
    }
}
