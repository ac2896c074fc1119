//! StageTrace - A complete sequence of stage events for one round
//!
//! A trace captures the full presentation timeline of a resolved round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::timing::TimingProfile;

/// Errors reading a trace back
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace events out of order at index {0}")]
    OutOfOrder(usize),
}

/// A complete trace of stage events for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Catalog outcome the round was drawn from
    pub outcome_id: String,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// All events in playback order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,

    /// Timing profile used for timestamps
    #[serde(default)]
    pub timing_profile: Option<TimingProfile>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, outcome_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            outcome_id: outcome_id.into(),
            session_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
            timing_profile: None,
        }
    }

    /// Parse a trace from JSON and check event ordering
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let trace: StageTrace = serde_json::from_str(json)?;
        if let Some(idx) = trace
            .events
            .windows(2)
            .position(|w| w[1].timestamp_ms < w[0].timestamp_ms)
        {
            return Err(TraceError::OutOfOrder(idx + 1));
        }
        Ok(trace)
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Set session ID
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set timing profile
    pub fn with_timing(mut self, profile: TimingProfile) -> Self {
        self.timing_profile = Some(profile);
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        let first = self.events.first().map(|e| e.timestamp_ms).unwrap_or(0.0);
        let last = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0.0);
        last - first
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Number of cascade steps in the trace
    pub fn cascade_count(&self) -> usize {
        self.events_by_category(StageCategory::Cascade).len()
    }

    /// Total win from the RoundComplete event
    pub fn total_win(&self) -> f64 {
        self.events
            .iter()
            .rev()
            .find_map(|e| match &e.stage {
                Stage::RoundComplete { total_win } => Some(*total_win),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            trace_id: self.trace_id.clone(),
            outcome_id: self.outcome_id.clone(),
            event_count: self.events.len(),
            duration_ms: self.duration_ms(),
            total_win: self.total_win(),
            cascade_count: self.cascade_count(),
            entered_free_mode: self.has_stage("free_mode_enter"),
            pick_bonus: self.has_stage("pick_bonus_trigger"),
            categories: StageCategory::ALL
                .iter()
                .map(|&category| (category, self.events_by_category(category).len()))
                .filter(|&(_, count)| count > 0)
                .collect(),
        }
    }
}

/// Summary of a trace for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub outcome_id: String,
    pub event_count: usize,
    pub duration_ms: f64,
    pub total_win: f64,
    pub cascade_count: usize,
    pub entered_free_mode: bool,
    pub pick_bonus: bool,
    /// Event count per category, categories without events omitted
    pub categories: Vec<(StageCategory, usize)>,
}
