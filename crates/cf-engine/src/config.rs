//! Engine configuration

use serde::{Deserialize, Serialize};

/// Free rounds a single feature may run before play stops
pub const DEFAULT_MAX_FEATURE_ROUNDS: u32 = 1000;

/// Knobs that bound round resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum cascade steps recorded per round (0 = unlimited)
    pub max_cascade_depth: u32,
    /// Maximum rounds `Session::play_feature` plays in one call (0 = unlimited)
    pub max_feature_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_depth: 0,
            max_feature_rounds: DEFAULT_MAX_FEATURE_ROUNDS,
        }
    }
}

impl EngineConfig {
    /// No cascade or feature caps
    ///
    /// A FREE outcome with a trigger count of 0 retriggers every round, so
    /// an unlimited feature never ends on such a catalog.
    pub fn unlimited() -> Self {
        Self {
            max_cascade_depth: 0,
            max_feature_rounds: 0,
        }
    }

    /// Builder: cap the cascade loop
    pub fn with_max_cascade_depth(mut self, depth: u32) -> Self {
        self.max_cascade_depth = depth;
        self
    }

    /// Builder: cap the rounds of one free-spin feature
    pub fn with_max_feature_rounds(mut self, rounds: u32) -> Self {
        self.max_feature_rounds = rounds;
        self
    }

    /// Whether `steps` recorded steps reach the cap
    pub fn cascade_limit_reached(&self, steps: usize) -> bool {
        self.max_cascade_depth != 0 && steps >= self.max_cascade_depth as usize
    }

    /// Whether `rounds` played feature rounds reach the cap
    pub fn feature_limit_reached(&self, rounds: usize) -> bool {
        self.max_feature_rounds != 0 && rounds >= self.max_feature_rounds as usize
    }
}
