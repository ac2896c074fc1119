//! Stage - The core enum defining every presentation phase of a round
//!
//! A Stage is NOT an animation, NOT an engine step.
//! A Stage is the SEMANTIC MEANING of a moment in an already-resolved round.

use serde::{Deserialize, Serialize};

/// Canonical round stage - the vocabulary shared by engine and presentation
///
/// Rendering, audio and UI controllers respond to stages, never to engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // ROUND LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Round started
    SpinStart {
        /// Outcome drawn for this round
        outcome_id: String,
        /// True when the round is played in free mode
        #[serde(default)]
        free_round: bool,
    },

    /// Initial grid dealt (after wild expansion, if any)
    GridDealt {
        /// One string of symbol codes per row, top to bottom
        rows: Vec<String>,
    },

    /// Wilds expanded into their neighbours (free mode only)
    WildsExpanded {
        /// Cells turned Wild by the expansion
        cells_changed: u32,
    },

    /// Round complete, ready for the next one
    RoundComplete {
        /// Total win of the round
        total_win: f64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // CASCADE
    // ═══════════════════════════════════════════════════════════════════════
    /// One cascade iteration: clusters paid, cells removed, grid refilled
    CascadeStep {
        /// Cascade index (0 = initial grid)
        step_index: u32,
        /// Number of clusters paid in this step
        cluster_count: u32,
        /// Number of cells removed
        removed_count: u32,
        /// Multiplier applied to this step's win
        multiplier: f64,
        /// Win awarded by this step
        win_amount: f64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // FREE MODE
    // ═══════════════════════════════════════════════════════════════════════
    /// Free mode entered from base mode
    FreeModeEnter {
        /// Free spins awarded
        awarded: u32,
    },

    /// Additional free spins awarded while already in free mode
    FreeModeRetrigger {
        /// Free spins added
        awarded: u32,
    },

    /// Free mode finished
    FreeModeExit,

    // ═══════════════════════════════════════════════════════════════════════
    // BONUS
    // ═══════════════════════════════════════════════════════════════════════
    /// Pick bonus triggered (the minigame itself is external)
    PickBonusTrigger,
}

impl Stage {
    /// Get the stage category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. } | Stage::GridDealt { .. } | Stage::RoundComplete { .. } => {
                StageCategory::RoundLifecycle
            }
            Stage::WildsExpanded { .. } => StageCategory::Expansion,
            Stage::CascadeStep { .. } => StageCategory::Cascade,
            Stage::FreeModeEnter { .. }
            | Stage::FreeModeRetrigger { .. }
            | Stage::FreeModeExit => StageCategory::Feature,
            Stage::PickBonusTrigger => StageCategory::Bonus,
        }
    }

    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::GridDealt { .. } => "grid_dealt",
            Stage::WildsExpanded { .. } => "wilds_expanded",
            Stage::RoundComplete { .. } => "round_complete",
            Stage::CascadeStep { .. } => "cascade_step",
            Stage::FreeModeEnter { .. } => "free_mode_enter",
            Stage::FreeModeRetrigger { .. } => "free_mode_retrigger",
            Stage::FreeModeExit => "free_mode_exit",
            Stage::PickBonusTrigger => "pick_bonus_trigger",
        }
    }

}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    RoundLifecycle,
    Cascade,
    Feature,
    Bonus,
    Expansion,
}

impl StageCategory {
    /// Every category, in playback order of first appearance
    pub const ALL: [StageCategory; 5] = [
        Self::RoundLifecycle,
        Self::Expansion,
        Self::Cascade,
        Self::Feature,
        Self::Bonus,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RoundLifecycle => "Round Lifecycle",
            Self::Cascade => "Cascade",
            Self::Feature => "Free Mode",
            Self::Bonus => "Bonus Games",
            Self::Expansion => "Wild Expansion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::CascadeStep {
            step_index: 2,
            cluster_count: 1,
            removed_count: 6,
            multiplier: 3.0,
            win_amount: 18.0,
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("cascade_step"));
        assert!(json.contains("removed_count"));

        let deserialized: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, deserialized);
    }

    #[test]
    fn test_stage_category() {
        assert_eq!(
            Stage::RoundComplete { total_win: 0.0 }.category(),
            StageCategory::RoundLifecycle
        );
        assert_eq!(Stage::FreeModeExit.category(), StageCategory::Feature);
        assert_eq!(Stage::PickBonusTrigger.category(), StageCategory::Bonus);
    }

    #[test]
    fn test_every_category_listed_once() {
        let stages = [
            Stage::GridDealt { rows: vec![] },
            Stage::WildsExpanded { cells_changed: 4 },
            Stage::FreeModeRetrigger { awarded: 5 },
            Stage::PickBonusTrigger,
        ];
        for stage in &stages {
            let category = stage.category();
            assert_eq!(StageCategory::ALL.iter().filter(|c| **c == category).count(), 1);
        }
        assert_eq!(StageCategory::Expansion.display_name(), "Wild Expansion");
    }
}
