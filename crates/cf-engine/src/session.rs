//! Session driver - owns the mutable state that outlives a single round
//!
//! A session holds its own free-spin state and random stream. Independent
//! sessions share nothing but the immutable catalog, so they can run on
//! separate threads without locks.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{GameMode, OutcomeCatalog};
use crate::config::EngineConfig;
use crate::free_spins::FreeSpinState;
use crate::resolver::{RoundResult, resolve_round};
use crate::rng::seeded;

/// Aggregated session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds: u64,
    pub free_rounds: u64,
    pub wins: u64,
    pub total_win: f64,
    pub max_win: f64,
    pub cascades: u64,
    pub free_mode_entries: u64,
    pub retriggers: u64,
    pub pick_bonuses: u64,
}

impl SessionStats {
    /// Fold one round into the totals
    pub fn record(&mut self, result: &RoundResult) {
        self.rounds += 1;
        if result.mode == GameMode::Free {
            self.free_rounds += 1;
        }
        if result.is_win() {
            self.wins += 1;
        }
        self.total_win += result.total_win;
        self.max_win = self.max_win.max(result.total_win);
        self.cascades += result.cascade_count() as u64;
        if result.entered_free_mode {
            self.free_mode_entries += 1;
        }
        if result.retriggered() {
            self.retriggers += 1;
        }
        if result.pick_bonus_triggered {
            self.pick_bonuses += 1;
        }
    }

    /// Combine stats from another session
    pub fn merge(&mut self, other: &SessionStats) {
        self.rounds += other.rounds;
        self.free_rounds += other.free_rounds;
        self.wins += other.wins;
        self.total_win += other.total_win;
        self.max_win = self.max_win.max(other.max_win);
        self.cascades += other.cascades;
        self.free_mode_entries += other.free_mode_entries;
        self.retriggers += other.retriggers;
        self.pick_bonuses += other.pick_bonuses;
    }

    /// Percentage of rounds that paid anything
    pub fn hit_rate(&self) -> f64 {
        if self.rounds > 0 {
            (self.wins as f64 / self.rounds as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Mean win per round
    pub fn average_win(&self) -> f64 {
        if self.rounds > 0 {
            self.total_win / self.rounds as f64
        } else {
            0.0
        }
    }

    /// Mean cascade steps per round
    pub fn average_cascades(&self) -> f64 {
        if self.rounds > 0 {
            self.cascades as f64 / self.rounds as f64
        } else {
            0.0
        }
    }
}

/// One player session
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<OutcomeCatalog>,
    free_spins: FreeSpinState,
    rng: ChaCha8Rng,
    config: EngineConfig,
    stats: SessionStats,
    /// Keep playing base rounds after the current one
    autoplay: bool,
    rounds_played: u64,
}

impl Session {
    /// New session with a reproducible random stream
    pub fn new(catalog: Arc<OutcomeCatalog>, seed: u64) -> Self {
        Self {
            catalog,
            free_spins: FreeSpinState::default(),
            rng: seeded(seed),
            config: EngineConfig::default(),
            stats: SessionStats::default(),
            autoplay: false,
            rounds_played: 0,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    pub fn catalog(&self) -> &OutcomeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    pub fn free_spin_state(&self) -> FreeSpinState {
        self.free_spins
    }

    pub fn in_free_mode(&self) -> bool {
        self.free_spins.in_free_mode
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.free_spins.remaining_free_spins
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    /// Resolve one round
    pub fn spin(&mut self) -> RoundResult {
        let result = resolve_round(
            &self.catalog,
            &mut self.free_spins,
            &mut self.rng,
            &self.config,
        );
        self.rounds_played += 1;
        self.stats.record(&result);
        result
    }

    /// Play free rounds until free mode ends or `max_feature_rounds` is hit
    ///
    /// Returns an empty list when the session is not in free mode. When the
    /// cap stops play the session is left in free mode.
    pub fn play_feature(&mut self) -> Vec<RoundResult> {
        let mut results = Vec::new();
        while self.free_spins.in_free_mode {
            if self.config.feature_limit_reached(results.len()) {
                log::warn!(
                    "Feature stopped after {} rounds with {} free spins left",
                    results.len(),
                    self.free_spins.remaining_free_spins
                );
                break;
            }
            results.push(self.spin());
        }
        results
    }

    /// Play up to `max_rounds` rounds
    ///
    /// After each round play continues while free mode is active or the
    /// autoplay flag is set, whichever applies, until the limit is hit.
    pub fn autoplay(&mut self, max_rounds: usize) -> Vec<RoundResult> {
        let mut results = Vec::with_capacity(max_rounds);
        while results.len() < max_rounds {
            results.push(self.spin());
            if !(self.autoplay || self.free_spins.in_free_mode) {
                break;
            }
        }
        results
    }
}
