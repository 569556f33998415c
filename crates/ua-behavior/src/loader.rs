//! JSON behavior-set loader.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "guard",
//!   "behaviors": [
//!     {
//!       "name": "Chase",
//!       "action": "chase",
//!       "weight": 2.0,
//!       "required_target_tags": ["intruder"],
//!       "considerations": [
//!         { "name": "in_sight" },
//!         { "name": "exhausted", "inverted": true }
//!       ]
//!     },
//!     { "name": "Patrol", "action": "patrol", "considerations": [{ "name": "always" }] }
//!   ]
//! }
//! ```
//!
//! | Field                  | Default     |
//! |------------------------|-------------|
//! | `action`               | none        |
//! | `reasoner`             | `"default"` |
//! | `weight`               | `1.0`       |
//! | `requires_target`      | `false`     |
//! | `required_target_tags` | `[]`        |
//! | `inverted`, `mute`     | `false`     |
//!
//! All names are resolved through a [`Registry`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Behavior, BehaviorResult, BehaviorSet, Registry};

// ── Definitions ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSetDef {
    pub name:      String,
    pub behaviors: Vec<BehaviorDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDef {
    pub name: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default = "default_reasoner")]
    pub reasoner: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub requires_target: bool,
    #[serde(default)]
    pub required_target_tags: Vec<String>,
    pub considerations: Vec<ConsiderationRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsiderationRef {
    pub name: String,
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub mute: bool,
}

fn default_reasoner() -> String {
    "default".to_string()
}

fn default_weight() -> f32 {
    1.0
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a behavior set from a JSON file.
pub fn load_behavior_set(path: &Path, registry: &mut Registry) -> BehaviorResult<BehaviorSet> {
    let file = File::open(path)?;
    load_behavior_set_reader(BufReader::new(file), registry)
}

/// Like [`load_behavior_set`] but accepts any `Read` source.
pub fn load_behavior_set_reader<R: Read>(
    reader:   R,
    registry: &mut Registry,
) -> BehaviorResult<BehaviorSet> {
    let def: BehaviorSetDef = serde_json::from_reader(reader)?;
    registry.build_behavior_set(&def)
}

/// Load a bare JSON array of behavior definitions.
pub fn load_behaviors_json<R: Read>(
    reader:   R,
    registry: &mut Registry,
) -> BehaviorResult<Vec<Arc<Behavior>>> {
    let defs: Vec<BehaviorDef> = serde_json::from_reader(reader)?;
    defs.iter().map(|d| registry.build_behavior(d)).collect()
}
