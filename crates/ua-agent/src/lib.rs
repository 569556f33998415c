//! `ua-agent`: the decision loop of the utility decision engine.
//!
//! # Per-tick loop
//!
//! ```text
//! UtilityAgent::tick(dt):
//!   ① Timer   : once `decision_interval` has elapsed, think:
//!                  search targets → expand behaviors into decisions →
//!                  score with pruning → enact the best.
//!   ② Action  : update the running action; a natural conclusion
//!                triggers an immediate re-think.
//! ```
//!
//! Enacting a decision that is similar to the running one (same behavior,
//! target and data) keeps the running action.  Anything else interrupts it
//! and starts a fresh action instance.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | [`World::step`] ticks agents on Rayon's pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ua_agent::{AgentBuilder, NoopObserver};
//!
//! let mut agent = AgentBuilder::new(AgentId(0))
//!     .config(config)
//!     .behavior_set(&guard_set)
//!     .build()?;
//! agent.tick(0.1, &targets, &mut NoopObserver)?;
//! ```

pub mod agent;
pub mod builder;
pub mod error;
pub mod observer;
pub mod result;
pub mod world;


pub use agent::UtilityAgent;
pub use builder::AgentBuilder;
pub use error::{AgentError, AgentResult};
pub use observer::{AgentEvent, AgentObserver, EventLog, NoopObserver};
pub use result::{DecisionResult, sorted_for_inspection};
pub use world::World;
