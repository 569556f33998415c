//! `ua-core`: foundational types for the utility decision engine.
//!
//! This crate is a dependency of every other `ua-*` crate.  It intentionally
//! has no `ua-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `TargetId`, `DataId`, `ConsiderationId`, `BehaviorId` |
//! | [`tags`]        | `Tag`, `TagSet` (64-bit tag membership)                          |
//! | [`geo`]         | `Position`, planar distance                                      |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                        |
//! | [`config`]      | `AgentConfig`: decision-loop tunables                           |
//! | [`error`]       | `CoreError`, `CoreResult`                                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod tags;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::AgentConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{AgentId, BehaviorId, ConsiderationId, DataId, TargetId};
pub use rng::{AgentRng, SimRng};
pub use tags::{Tag, TagSet};
