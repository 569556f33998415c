//! Decision-loop configuration.

use crate::{CoreError, CoreResult};

/// Numeric tunables supplied to an agent at construction.
///
/// Typically loaded from a TOML/JSON file by the application crate.  The
/// engine treats these as opaque constants after [`validate`][Self::validate]
/// has accepted them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Seconds between timer-driven decision cycles.  Default: 1.0.
    pub decision_interval: f32,

    /// Radius handed to the target provider.  Default: 100.0.
    pub target_search_radius: f32,

    /// Nearest targets kept per cycle after sorting by distance.  Default: 12.
    pub max_targets_per_decision: usize,

    /// Multiplier applied to the currently enacted, unconcluded decision when
    /// it is scored again.  1.0 disables stickiness.  Default: 1.25.
    pub same_decision_bonus: f32,

    /// Global seed for the agent's RNG.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            decision_interval:        1.0,
            target_search_radius:     100.0,
            max_targets_per_decision: 12,
            same_decision_bonus:      1.25,
            seed:                     0,
        }
    }
}

impl AgentConfig {
    /// Reject values that would break the decision loop.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.decision_interval.is_finite() || self.decision_interval < 0.0 {
            return Err(CoreError::Config(format!(
                "decision_interval must be a finite, non-negative number of seconds (got {})",
                self.decision_interval
            )));
        }
        if !self.target_search_radius.is_finite() || self.target_search_radius < 0.0 {
            return Err(CoreError::Config(format!(
                "target_search_radius must be finite and non-negative (got {})",
                self.target_search_radius
            )));
        }
        if !self.same_decision_bonus.is_finite() || self.same_decision_bonus <= 0.0 {
            return Err(CoreError::Config(format!(
                "same_decision_bonus must be positive (got {})",
                self.same_decision_bonus
            )));
        }
        Ok(())
    }
}
