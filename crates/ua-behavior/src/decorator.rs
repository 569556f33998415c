//! Per-behavior view of a shared consideration.

use std::borrow::Cow;
use std::sync::Arc;

use ua_core::TagSet;

use crate::scorers::OPT_IN;
use crate::{Consideration, Decision, DecisionContext};

/// Wraps a shared [`Consideration`] with two per-use toggles.
///
/// - `mute`: always scores `1`, so the consideration drops out of the product
///   without being evaluated.
/// - `inverted`: scores `1 - s`.
///
/// Everything else (priority, cacheability, target filter) is delegated to
/// the wrapped consideration.
#[derive(Clone, Debug)]
pub struct ConsiderationDecorator {
    consideration: Arc<Consideration>,
    inverted:      bool,
    mute:          bool,
}

impl ConsiderationDecorator {
    pub fn new(consideration: Arc<Consideration>) -> Self {
        Self { consideration, inverted: false, mute: false }
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_mute(mut self, mute: bool) -> Self {
        self.mute = mute;
        self
    }

    #[inline]
    pub fn consideration(&self) -> &Arc<Consideration> {
        &self.consideration
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.mute
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.consideration.priority()
    }

    #[inline]
    pub fn should_cache_score(&self) -> bool {
        self.consideration.should_cache_score()
    }

    pub fn requires_target(&self) -> bool {
        self.consideration.requires_target()
    }

    pub fn required_target_tags(&self) -> TagSet {
        self.consideration.required_target_tags()
    }

    /// Display name; `"Not "`-prefixed when inverted.
    pub fn name(&self) -> Cow<'_, str> {
        if self.inverted {
            Cow::Owned(format!("Not {}", self.consideration.name()))
        } else {
            Cow::Borrowed(self.consideration.name())
        }
    }

    /// Apply the inversion to an already computed wrapped score.
    #[inline]
    pub fn apply(&self, raw: f32) -> f32 {
        if self.inverted { 1.0 - raw } else { raw }
    }

    pub fn evaluate(&self, decision: &Decision, ctx: &DecisionContext<'_>) -> f32 {
        if self.mute {
            return OPT_IN;
        }
        self.apply(self.consideration.evaluate(decision, ctx))
    }
}

impl From<Arc<Consideration>> for ConsiderationDecorator {
    fn from(consideration: Arc<Consideration>) -> Self {
        Self::new(consideration)
    }
}

impl From<Consideration> for ConsiderationDecorator {
    fn from(consideration: Consideration) -> Self {
        Self::new(Arc::new(consideration))
    }
}
