//! `ua-behavior`: the scoring model of the utility decision engine.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                        |
//! |-------------------|-----------------------------------------------------------------|
//! | [`context`]       | `DecisionContext<'a>`: read-only agent snapshot for scoring    |
//! | [`data`]          | `DecisionData`: typed payload attached to a decision           |
//! | [`consideration`] | `Consideration` (leaf / composite), `Scorer` trait              |
//! | [`scorers`]       | `BoolScorer`, `CurveScorer`, `ResponseCurve`, `in_range`        |
//! | [`decorator`]     | `ConsiderationDecorator` (invert / mute)                        |
//! | [`cache`]         | `ScoreCache`, `ScoreKey`                                        |
//! | [`decision`]      | `Decision` and the pruned, compensated scoring algorithm        |
//! | [`action`]        | `Action` trait, `ActionTemplate`, `ActionContext`, `ActionRunner` |
//! | [`behavior`]      | `Behavior`, `BehaviorBuilder`, `BehaviorSet`                    |
//! | [`reasoner`]      | `Reasoner` trait and the built-in candidate generators          |
//! | [`registry`]      | `Registry`: tag-keyed factory for actions, reasoners, considerations |
//! | [`loader`]        | JSON behavior-set definitions                                   |
//! | [`error`]         | `BehaviorError`, `ActionError`                                  |
//!
//! # Design notes
//!
//! A decision cycle is a pure, synchronous computation: every scorer gets a
//! shared [`DecisionContext`] and the [`Decision`] being scored, and must
//! not mutate anything.  Only the running [`Action`] mutates agent state,
//! through its [`ActionContext`].

pub mod action;
pub mod behavior;
pub mod cache;
pub mod consideration;
pub mod context;
pub mod data;
pub mod decision;
pub mod decorator;
pub mod error;
pub mod loader;
pub mod reasoner;
pub mod registry;
pub mod scorers;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionContext, ActionRunner, ActionState, ActionTemplate};
pub use behavior::{Behavior, BehaviorBuilder, BehaviorSet};
pub use cache::{ScoreCache, ScoreKey};
pub use consideration::{Consideration, ConsiderationKind, Scorer};
pub use context::DecisionContext;
pub use data::DecisionData;
pub use decision::Decision;
pub use decorator::ConsiderationDecorator;
pub use error::{ActionError, ActionResult, BehaviorError, BehaviorResult};
pub use loader::{
    BehaviorDef, BehaviorSetDef, ConsiderationRef, load_behavior_set, load_behavior_set_reader,
    load_behaviors_json,
};
pub use reasoner::{DataReasoner, DefaultReasoner, PerTargetReasoner, Reasoner, UntargetedReasoner};
pub use registry::Registry;
pub use scorers::{BoolScorer, CurveScorer, OPT_IN, OPT_OUT, ResponseCurve, clamp01, in_range};
