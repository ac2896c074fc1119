//! Round resolution - selection, expansion, cascade loop, settlement
//!
//! One call produces the complete, ordered record of a round. Nothing here
//! waits or schedules: presentation layers replay the finished result at
//! their own pace.

use serde::{Deserialize, Serialize};

use crate::cascade::collapse;
use crate::catalog::{GameMode, OutcomeCatalog, OutcomeDefinition};
use crate::cluster::{Cluster, find_clusters, winning_positions};
use crate::config::EngineConfig;
use crate::free_spins::{FreeSpinState, expand_wilds};
use crate::grid::{Grid, Position};
use crate::payout::{applied_multiplier, cluster_win};
use crate::rng::RandomSource;
use crate::selector::select;
use crate::symbols::Symbol;

// ═══════════════════════════════════════════════════════════════════════════════
// RESULT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// One iteration of the cascade loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// Cascade index (0 = clusters on the grid the round starts from)
    pub index: u32,
    /// Clusters found on the grid before this step's removal
    pub clusters_found: Vec<Cluster>,
    /// Cells removed, row-major
    pub removed_positions: Vec<Position>,
    /// Paytable sum before the multiplier
    pub cluster_win: f64,
    pub applied_multiplier: f64,
    /// `cluster_win * applied_multiplier`
    pub win_amount: f64,
    /// Grid after collapse and refill
    pub grid_after: Grid,
}

/// Complete outcome of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub outcome_id: String,
    /// Mode the round was played in
    pub mode: GameMode,
    /// Grid the cascade loop started from (after wild expansion)
    pub initial_grid: Grid,
    /// Cells turned Wild by expansion
    pub wilds_expanded: usize,
    /// Scatters left on the grid after wild expansion
    pub scatter_count: usize,
    pub steps: Vec<CascadeStep>,
    pub total_win: f64,
    pub entered_free_mode: bool,
    pub exited_free_mode: bool,
    pub pick_bonus_triggered: bool,
    /// Spins awarded by this round's trigger, if it fired
    pub free_spins_awarded: Option<u32>,
    /// Free spins left after settlement
    pub free_spins_remaining: u32,
}

impl RoundResult {
    pub fn cascade_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Grid left on screen when the round ends
    pub fn final_grid(&self) -> &Grid {
        self.steps
            .last()
            .map(|s| &s.grid_after)
            .unwrap_or(&self.initial_grid)
    }

    /// True if the trigger fired while already in free mode
    pub fn retriggered(&self) -> bool {
        self.free_spins_awarded.is_some() && self.mode == GameMode::Free
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolve one round drawn from `catalog` for the session's current mode
pub fn resolve_round<R: RandomSource + ?Sized>(
    catalog: &OutcomeCatalog,
    state: &mut FreeSpinState,
    rng: &mut R,
    config: &EngineConfig,
) -> RoundResult {
    let outcome = select(catalog, state.mode(), rng);
    resolve_outcome(outcome, state, rng, config)
}

/// Resolve one round from a specific outcome
pub fn resolve_outcome<R: RandomSource + ?Sized>(
    outcome: &OutcomeDefinition,
    state: &mut FreeSpinState,
    rng: &mut R,
    config: &EngineConfig,
) -> RoundResult {
    let mode = state.mode();
    let was_free = state.in_free_mode;

    let dealt = &outcome.initial_grid;
    let (mut grid, wilds_expanded) = if was_free {
        expand_wilds(dealt)
    } else {
        (dealt.clone(), 0)
    };
    let initial_grid = grid.clone();
    // Expansion can cover a Scatter, so count on the played grid
    let scatter_count = grid.count(Symbol::Scatter);

    let free_spins_awarded = state.check_trigger(scatter_count, outcome);
    let entered_free_mode = free_spins_awarded.is_some() && !was_free;
    if let Some(awarded) = free_spins_awarded {
        if entered_free_mode {
            log::info!(
                "Free mode entered on '{}': {} scatters, {} spins awarded",
                outcome.id,
                scatter_count,
                awarded
            );
        } else {
            log::info!(
                "Free mode retriggered on '{}': +{} spins ({} remaining)",
                outcome.id,
                awarded,
                state.remaining_free_spins
            );
        }
    }

    let mut steps = Vec::new();
    let mut total_win = 0.0;
    let mut index = 0u32;
    loop {
        let clusters = find_clusters(&grid);
        if clusters.is_empty() {
            break;
        }
        if config.cascade_limit_reached(steps.len()) {
            log::warn!(
                "Cascade cap of {} reached on '{}'; {} cluster(s) left unpaid",
                config.max_cascade_depth,
                outcome.id,
                clusters.len()
            );
            break;
        }

        let base_win = cluster_win(&clusters, &outcome.pay_table);
        let multiplier = applied_multiplier(outcome, index);
        let win_amount = base_win * multiplier;
        total_win += win_amount;

        let removed = winning_positions(&clusters);
        let grid_after = collapse(&grid, &removed, rng);

        log::debug!(
            "cascade {} on '{}': {} cluster(s), {} cells, {} x {} = {}",
            index,
            outcome.id,
            clusters.len(),
            removed.len(),
            base_win,
            multiplier,
            win_amount
        );

        grid = grid_after.clone();
        steps.push(CascadeStep {
            index,
            clusters_found: clusters,
            removed_positions: removed,
            cluster_win: base_win,
            applied_multiplier: multiplier,
            win_amount,
            grid_after,
        });
        index += 1;
    }

    let pick_bonus_triggered = outcome.pick_bonus_trigger;

    let exited_free_mode = state.settle_round();
    if exited_free_mode {
        log::info!("Free mode finished after '{}'", outcome.id);
    }

    RoundResult {
        outcome_id: outcome.id.clone(),
        mode,
        initial_grid,
        wilds_expanded,
        scatter_count,
        steps,
        total_win,
        entered_free_mode,
        exited_free_mode,
        pick_bonus_triggered,
        free_spins_awarded,
        free_spins_remaining: state.remaining_free_spins,
    }
}
