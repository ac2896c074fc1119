//! Stage generation - map a resolved round onto the cf-stage vocabulary
//!
//! Timestamps come from a [`TimestampGenerator`]; nothing sleeps.

use cf_stage::{Stage, StageEvent, StagePayload, StageTrace, TimestampGenerator, TimingConfig};

use crate::catalog::GameMode;
use crate::events::RoundObserver;
use crate::free_spins::FreeModeChange;
use crate::grid::Position;
use crate::resolver::{CascadeStep, RoundResult};

fn wire_positions(positions: &[Position]) -> Vec<(u8, u8)> {
    positions
        .iter()
        .map(|p| {
            (
                u8::try_from(p.row).unwrap_or(u8::MAX),
                u8::try_from(p.col).unwrap_or(u8::MAX),
            )
        })
        .collect()
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn cascade_event(step: &CascadeStep, running_total: f64, timestamp_ms: f64) -> StageEvent {
    StageEvent::with_payload(
        Stage::CascadeStep {
            step_index: step.index,
            cluster_count: count_u32(step.clusters_found.len()),
            removed_count: count_u32(step.removed_positions.len()),
            multiplier: step.applied_multiplier,
            win_amount: step.win_amount,
        },
        timestamp_ms,
        StagePayload::with_win(step.win_amount, running_total)
            .multiplier(step.applied_multiplier)
            .grid(step.grid_after.row_strings())
            .positions(wire_positions(&step.removed_positions)),
    )
}

impl RoundResult {
    /// Full stage sequence for this round, in playback order
    pub fn generate_stages(&self, timing: &mut TimestampGenerator) -> Vec<StageEvent> {
        let mut events = Vec::new();

        // 1. Round start and deal
        events.push(StageEvent::new(
            Stage::SpinStart {
                outcome_id: self.outcome_id.clone(),
                free_round: self.mode == GameMode::Free,
            },
            timing.current(),
        ));
        events.push(StageEvent::with_payload(
            Stage::GridDealt {
                rows: self.initial_grid.row_strings(),
            },
            timing.deal(),
            StagePayload::new().grid(self.initial_grid.row_strings()),
        ));
        if self.wilds_expanded > 0 {
            events.push(StageEvent::new(
                Stage::WildsExpanded {
                    cells_changed: count_u32(self.wilds_expanded),
                },
                timing.wild_expand(),
            ));
        }

        // 2. Cascades
        let mut running_total = 0.0;
        for step in &self.steps {
            running_total += step.win_amount;
            events.push(cascade_event(step, running_total, timing.cascade_step()));
        }

        // 3. Features
        if let Some(awarded) = self.free_spins_awarded {
            let stage = if self.entered_free_mode {
                Stage::FreeModeEnter { awarded }
            } else {
                Stage::FreeModeRetrigger { awarded }
            };
            events.push(StageEvent::with_payload(
                stage,
                timing.feature_transition(),
                StagePayload::new().spins_remaining(self.free_spins_remaining),
            ));
        }
        if self.pick_bonus_triggered {
            events.push(StageEvent::new(
                Stage::PickBonusTrigger,
                timing.feature_transition(),
            ));
        }
        if self.exited_free_mode {
            events.push(StageEvent::new(Stage::FreeModeExit, timing.feature_transition()));
        }

        // 4. Round end
        events.push(StageEvent::with_payload(
            Stage::RoundComplete {
                total_win: self.total_win,
            },
            timing.win_reveal(),
            StagePayload::with_win(self.total_win, self.total_win),
        ));

        events
    }

    /// Stage events wrapped in a trace
    pub fn to_trace(&self, trace_id: impl Into<String>, timing: TimingConfig) -> StageTrace {
        let profile = timing.profile;
        let mut generator = TimestampGenerator::new(timing);
        let mut trace = StageTrace::new(trace_id, self.outcome_id.clone()).with_timing(profile);
        for event in self.generate_stages(&mut generator) {
            trace.push(event);
        }
        trace
    }
}

/// Observer that builds a [`StageTrace`] from replayed callbacks
///
/// Sees only what the observer callbacks carry, so spin and deal stages are
/// absent; use [`RoundResult::generate_stages`] for the full sequence.
#[derive(Debug, Clone)]
pub struct StageRecorder {
    timing: TimestampGenerator,
    running_total: f64,
    trace: StageTrace,
}

impl StageRecorder {
    pub fn new(trace_id: impl Into<String>, outcome_id: impl Into<String>, timing: TimingConfig) -> Self {
        let profile = timing.profile;
        Self {
            timing: TimestampGenerator::new(timing),
            running_total: 0.0,
            trace: StageTrace::new(trace_id, outcome_id).with_timing(profile),
        }
    }

    pub fn trace(&self) -> &StageTrace {
        &self.trace
    }

    pub fn into_trace(self) -> StageTrace {
        self.trace
    }
}

impl RoundObserver for StageRecorder {
    fn on_cascade_step(&mut self, step: &CascadeStep) {
        self.running_total += step.win_amount;
        let at = self.timing.cascade_step();
        self.trace.push(cascade_event(step, self.running_total, at));
    }

    fn on_free_mode_changed(&mut self, change: FreeModeChange) {
        // Award counts are not part of the callback
        let stage = match change {
            FreeModeChange::Entered => Stage::FreeModeEnter { awarded: 0 },
            FreeModeChange::Exited => Stage::FreeModeExit,
        };
        let at = self.timing.feature_transition();
        self.trace.push(StageEvent::new(stage, at));
    }

    fn on_pick_bonus_triggered(&mut self) {
        let at = self.timing.feature_transition();
        self.trace.push(StageEvent::new(Stage::PickBonusTrigger, at));
    }

    fn on_round_complete(&mut self, total_win: f64) {
        let at = self.timing.win_reveal();
        self.trace.push(StageEvent::with_payload(
            Stage::RoundComplete { total_win },
            at,
            StagePayload::with_win(total_win, total_win),
        ));
    }
}
