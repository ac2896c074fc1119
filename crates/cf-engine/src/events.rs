//! Presentation boundary
//!
//! Rendering, audio and UI hang off a [`RoundObserver`]. Observers only see a
//! round after it has been fully resolved, through shared references, so they
//! cannot feed back into the computation.

use crate::free_spins::FreeModeChange;
use crate::resolver::{CascadeStep, RoundResult};

/// Consumer of round events; every method defaults to a no-op
pub trait RoundObserver {
    fn on_cascade_step(&mut self, _step: &CascadeStep) {}

    fn on_free_mode_changed(&mut self, _change: FreeModeChange) {}

    fn on_pick_bonus_triggered(&mut self) {}

    fn on_round_complete(&mut self, _total_win: f64) {}
}

impl RoundResult {
    /// Feed this result to an observer
    ///
    /// Order: each cascade step, free mode entered, pick bonus, free mode
    /// exited, round complete.
    pub fn replay(&self, observer: &mut dyn RoundObserver) {
        for step in &self.steps {
            observer.on_cascade_step(step);
        }
        if self.entered_free_mode {
            observer.on_free_mode_changed(FreeModeChange::Entered);
        }
        if self.pick_bonus_triggered {
            observer.on_pick_bonus_triggered();
        }
        if self.exited_free_mode {
            observer.on_free_mode_changed(FreeModeChange::Exited);
        }
        observer.on_round_complete(self.total_win);
    }
}

/// Observer that records callbacks as plain strings
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub entries: Vec<String>,
}

impl RoundObserver for EventLog {
    fn on_cascade_step(&mut self, step: &CascadeStep) {
        self.entries
            .push(format!("cascade:{}:{}", step.index, step.win_amount));
    }

    fn on_free_mode_changed(&mut self, change: FreeModeChange) {
        let name = match change {
            FreeModeChange::Entered => "free:entered",
            FreeModeChange::Exited => "free:exited",
        };
        self.entries.push(name.to_string());
    }

    fn on_pick_bonus_triggered(&mut self) {
        self.entries.push("pick_bonus".to_string());
    }

    fn on_round_complete(&mut self, total_win: f64) {
        self.entries.push(format!("complete:{total_win}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GameMode;
    use crate::grid::Grid;
    use crate::symbols::Symbol;

    fn result() -> RoundResult {
        let grid = Grid::standard(Symbol::B);
        RoundResult {
            outcome_id: "r".into(),
            mode: GameMode::Base,
            initial_grid: grid.clone(),
            wilds_expanded: 0,
            scatter_count: 3,
            steps: vec![CascadeStep {
                index: 0,
                clusters_found: Vec::new(),
                removed_positions: Vec::new(),
                cluster_win: 2.0,
                applied_multiplier: 1.0,
                win_amount: 2.0,
                grid_after: grid,
            }],
            total_win: 2.0,
            entered_free_mode: true,
            exited_free_mode: true,
            pick_bonus_triggered: true,
            free_spins_awarded: Some(0),
            free_spins_remaining: 0,
        }
    }

    #[test]
    fn test_replay_order() {
        let mut log = EventLog::default();
        result().replay(&mut log);
        assert_eq!(
            log.entries,
            vec![
                "cascade:0:2",
                "free:entered",
                "pick_bonus",
                "free:exited",
                "complete:2"
            ]
        );
    }

    #[test]
    fn test_default_methods_are_noops() {
        struct Silent;
        impl RoundObserver for Silent {}
        result().replay(&mut Silent);
    }
}
