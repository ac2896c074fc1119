//! Free-spin state machine and wild expansion
//!
//! Two states, `Base` and `Free`. The session owns one [`FreeSpinState`] and
//! the resolver is the only thing that mutates it:
//!
//! 1. after the deal, [`FreeSpinState::check_trigger`] runs once per round
//! 2. after the cascades settle, [`FreeSpinState::settle_round`] counts the
//!    round down and leaves free mode at zero

use serde::{Deserialize, Serialize};

use crate::catalog::{GameMode, OutcomeDefinition};
use crate::grid::{Grid, Position};
use crate::symbols::Symbol;

/// Session-owned free-spin state; persists across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpinState {
    pub in_free_mode: bool,
    pub remaining_free_spins: u32,
}

/// Free-mode transition reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeModeChange {
    Entered,
    Exited,
}

impl FreeSpinState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode the next outcome is drawn for
    pub fn mode(&self) -> GameMode {
        if self.in_free_mode {
            GameMode::Free
        } else {
            GameMode::Base
        }
    }

    /// Apply the scatter trigger; returns the spins awarded, if triggered
    ///
    /// The award stacks onto any spins already remaining.
    pub fn check_trigger(&mut self, scatter_count: usize, outcome: &OutcomeDefinition) -> Option<u32> {
        if scatter_count < outcome.free_spin_trigger_count as usize {
            return None;
        }
        self.remaining_free_spins = self
            .remaining_free_spins
            .saturating_add(outcome.free_spin_award);
        self.in_free_mode = true;
        Some(outcome.free_spin_award)
    }

    /// Count down one free round; returns true if free mode was left
    pub fn settle_round(&mut self) -> bool {
        if !self.in_free_mode {
            return false;
        }
        self.remaining_free_spins = self.remaining_free_spins.saturating_sub(1);
        if self.remaining_free_spins == 0 {
            self.in_free_mode = false;
            return true;
        }
        false
    }
}

/// Turn the 4-neighbours of every Wild into Wild, in one pass
///
/// Only Wilds present in `grid` expand; cells made Wild here do not spread
/// further. Returns the new grid and how many cells changed.
pub fn expand_wilds(grid: &Grid) -> (Grid, usize) {
    let origins: Vec<Position> = grid.positions_of(Symbol::Wild);
    let mut expanded = grid.clone();
    let mut changed = 0;
    for origin in origins {
        for pos in grid.neighbors(origin) {
            if expanded[pos] != Symbol::Wild {
                expanded.set(pos, Symbol::Wild);
                changed += 1;
            }
        }
    }
    (expanded, changed)
}
