//! StageEvent - A stage occurrence with metadata
//!
//! Wraps a Stage with its presentation timestamp and payload.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Presentation timestamp in milliseconds from round start
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    // ═══ WIN DATA ═══
    /// Win amount carried by the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<f64>,

    /// Running total of the round so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_total: Option<f64>,

    /// Current multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,

    // ═══ GRID DATA ═══
    /// Grid rows (symbol codes) after this event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<String>>,

    /// Cells affected by this event as (row, col)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<(u8, u8)>,

    // ═══ FEATURE DATA ═══
    /// Free spins remaining after this event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spins_remaining: Option<u32>,
}

impl StagePayload {
    /// Create empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with win data
    pub fn with_win(win_amount: f64, running_total: f64) -> Self {
        Self {
            win_amount: Some(win_amount),
            running_total: Some(running_total),
            ..Default::default()
        }
    }

    /// Builder: set multiplier
    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = Some(mult);
        self
    }

    /// Builder: set grid snapshot
    pub fn grid(mut self, rows: Vec<String>) -> Self {
        self.grid = Some(rows);
        self
    }

    /// Builder: set affected positions
    pub fn positions(mut self, positions: Vec<(u8, u8)>) -> Self {
        self.positions = positions;
        self
    }

    /// Builder: set spins remaining
    pub fn spins_remaining(mut self, spins: u32) -> Self {
        self.spins_remaining = Some(spins);
        self
    }
}
