//! Stock leaf scorers.
//!
//! | Scorer          | Raw score                                                 |
//! |-----------------|-----------------------------------------------------------|
//! | [`BoolScorer`]  | predicate → `OPT_IN` / `OPT_OUT`                          |
//! | [`CurveScorer`] | numeric input normalized over `[min, max]` → curve        |
//! | [`in_range`]    | target within a distance of the agent (a `BoolScorer`)    |

use crate::{Decision, DecisionContext, Scorer};

/// Veto the decision.
pub const OPT_OUT: f32 = 0.0;
/// Fully opt in, the maximum score.
pub const OPT_IN: f32 = 1.0;

/// Clamp to `[0, 1]`; NaN maps to `0`.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

// ── BoolScorer ────────────────────────────────────────────────────────────────

/// Scores `1` when the predicate holds and `0` otherwise.
pub struct BoolScorer<F>(F);

impl<F> BoolScorer<F>
where
    F: Fn(&Decision, &DecisionContext<'_>) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<F> Scorer for BoolScorer<F>
where
    F: Fn(&Decision, &DecisionContext<'_>) -> bool + Send + Sync,
{
    #[inline]
    fn score(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32 {
        if (self.0)(decision, ctx) { OPT_IN } else { OPT_OUT }
    }
}

/// `1` if the decision's target lies within `distance` of the agent.
///
/// Decisions without a target score `0`.
pub fn in_range(
    distance: f32,
) -> BoolScorer<impl Fn(&Decision, &DecisionContext<'_>) -> bool + Send + Sync> {
    let limit_sq = distance * distance;
    BoolScorer::new(move |decision: &Decision, ctx: &DecisionContext<'_>| {
        decision
            .target()
            .is_some_and(|t| t.position.distance_sq(ctx.position) <= limit_sq)
    })
}

// ── ResponseCurve ─────────────────────────────────────────────────────────────

/// Maps a normalized input `x ∈ [0, 1]` to a raw score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResponseCurve {
    /// `slope * x + intercept`
    Linear { slope: f32, intercept: f32 },
    /// `x ^ exponent`
    Polynomial { exponent: f32 },
    /// `1 / (1 + e^(-steepness * (x - midpoint)))`
    Logistic { steepness: f32, midpoint: f32 },
    /// `1` at or above `threshold`, else `0`
    Step { threshold: f32 },
}

impl ResponseCurve {
    /// The identity curve.
    pub const IDENTITY: ResponseCurve = ResponseCurve::Linear { slope: 1.0, intercept: 0.0 };

    pub fn apply(self, x: f32) -> f32 {
        match self {
            ResponseCurve::Linear { slope, intercept } => slope * x + intercept,
            ResponseCurve::Polynomial { exponent } => x.powf(exponent),
            ResponseCurve::Logistic { steepness, midpoint } => {
                1.0 / (1.0 + (-steepness * (x - midpoint)).exp())
            }
            ResponseCurve::Step { threshold } => {
                if x >= threshold { 1.0 } else { 0.0 }
            }
        }
    }
}

// ── CurveScorer ───────────────────────────────────────────────────────────────

/// Reads a numeric input, normalizes it over `[min, max]`, and maps it
/// through a [`ResponseCurve`].
///
/// An input of `None` (missing component, no target, …) opts out.
pub struct CurveScorer<F> {
    input: F,
    min:   f32,
    max:   f32,
    curve: ResponseCurve,
}

impl<F> CurveScorer<F>
where
    F: Fn(&Decision, &DecisionContext<'_>) -> Option<f32> + Send + Sync,
{
    pub fn new(input: F, min: f32, max: f32, curve: ResponseCurve) -> Self {
        Self { input, min, max, curve }
    }

    /// Position of `value` in `[min, max]`, clamped.  A degenerate range
    /// acts as a step at `min`.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span.abs() <= f32::EPSILON {
            return if value >= self.min { 1.0 } else { 0.0 };
        }
        clamp01((value - self.min) / span)
    }
}

impl<F> Scorer for CurveScorer<F>
where
    F: Fn(&Decision, &DecisionContext<'_>) -> Option<f32> + Send + Sync,
{
    fn score(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32 {
        match (self.input)(decision, ctx) {
            Some(value) => self.curve.apply(self.normalize(value)),
            None => OPT_OUT,
        }
    }
}
