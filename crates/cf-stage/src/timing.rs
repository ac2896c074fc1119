//! Timing profiles for stage event placement
//!
//! Playback pacing is data: a profile turns a stage sequence into timestamps.
//! Consumers decide how (and whether) to wait between them.

use serde::{Deserialize, Serialize};

/// Timing profile for stage events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Studio mode (instant, for inspection and tests)
    Studio,
}

impl TimingProfile {
    /// Parse from a name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "turbo" => Some(Self::Turbo),
            "studio" => Some(Self::Studio),
            _ => None,
        }
    }
}

/// Detailed timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Drop-in of the initial grid (ms)
    pub deal_duration_ms: f64,

    /// Wild expansion animation (ms)
    pub wild_expand_duration_ms: f64,

    /// Cluster removal + refill per cascade step (ms)
    pub cascade_step_duration_ms: f64,

    /// Feature enter/exit transition (ms)
    pub feature_transition_ms: f64,

    /// Delay before the round-complete banner (ms)
    pub win_reveal_delay_ms: f64,

    /// Minimum time between stage events (ms)
    pub min_event_interval_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            deal_duration_ms: 600.0,
            wild_expand_duration_ms: 400.0,
            cascade_step_duration_ms: 900.0,
            feature_transition_ms: 2000.0,
            win_reveal_delay_ms: 400.0,
            min_event_interval_ms: 50.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            deal_duration_ms: 250.0,
            wild_expand_duration_ms: 150.0,
            cascade_step_duration_ms: 350.0,
            feature_transition_ms: 800.0,
            win_reveal_delay_ms: 150.0,
            min_event_interval_ms: 25.0,
        }
    }

    /// Studio mode: every stage lands on the same instant
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            deal_duration_ms: 0.0,
            wild_expand_duration_ms: 0.0,
            cascade_step_duration_ms: 0.0,
            feature_transition_ms: 0.0,
            win_reveal_delay_ms: 0.0,
            min_event_interval_ms: 0.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Timestamp generator for sequential events
#[derive(Debug, Clone)]
pub struct TimestampGenerator {
    current_ms: f64,
    config: TimingConfig,
}

impl TimestampGenerator {
    /// Create new generator
    pub fn new(config: TimingConfig) -> Self {
        Self {
            current_ms: 0.0,
            config,
        }
    }

    /// Get current timestamp
    pub fn current(&self) -> f64 {
        self.current_ms
    }

    /// Advance by duration and return new timestamp
    pub fn advance(&mut self, duration_ms: f64) -> f64 {
        self.current_ms += duration_ms.max(self.config.min_event_interval_ms);
        self.current_ms
    }

    /// Advance for the initial deal
    pub fn deal(&mut self) -> f64 {
        self.advance(self.config.deal_duration_ms)
    }

    /// Advance for wild expansion
    pub fn wild_expand(&mut self) -> f64 {
        self.advance(self.config.wild_expand_duration_ms)
    }

    /// Advance for cascade step
    pub fn cascade_step(&mut self) -> f64 {
        self.advance(self.config.cascade_step_duration_ms)
    }

    /// Advance for feature enter/exit
    pub fn feature_transition(&mut self) -> f64 {
        self.advance(self.config.feature_transition_ms)
    }

    /// Advance for win reveal
    pub fn win_reveal(&mut self) -> f64 {
        self.advance(self.config.win_reveal_delay_ms)
    }
}
