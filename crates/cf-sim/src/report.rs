//! Simulation report types and text rendering

use anyhow::{Context, Result};
use serde::Serialize;

use cf_engine::{GameMode, RoundResult, SessionStats};
use cf_stage::{StageTrace, TraceSummary};

/// Results of one simulated session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub index: usize,
    pub seed: u64,
    pub stats: SessionStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<StageTrace>,
}

/// Results of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub catalog_outcomes: usize,
    pub aggregate: SessionStats,
    pub sessions: Vec<SessionReport>,
}

impl SimulationReport {
    pub fn new(catalog_outcomes: usize, sessions: Vec<SessionReport>) -> Self {
        let mut aggregate = SessionStats::default();
        for session in &sessions {
            aggregate.merge(&session.stats);
        }
        Self {
            catalog_outcomes,
            aggregate,
            sessions,
        }
    }

    pub fn print_text(&self) {
        for session in &self.sessions {
            for (n, round) in session.rounds.iter().enumerate() {
                println!("{}", round_line(session.index, n, round));
            }
            for trace in &session.traces {
                match serde_json::to_string(trace) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::warn!("Skipping trace {}: {}", trace.trace_id, e),
                }
            }
            let s = &session.stats;
            println!(
                "session {:>3} (seed {}): {} rounds, hit rate {:.1}%, total win {:.2}, max win {:.2}",
                session.index,
                session.seed,
                s.rounds,
                s.hit_rate(),
                s.total_win,
                s.max_win
            );
        }

        let a = &self.aggregate;
        println!();
        println!("═══ SUMMARY ({} outcomes in catalog) ═══", self.catalog_outcomes);
        println!("  rounds          {:>10} ({} free)", a.rounds, a.free_rounds);
        println!("  hit rate        {:>9.2}%", a.hit_rate());
        println!("  total win       {:>10.2}", a.total_win);
        println!("  average win     {:>10.4}", a.average_win());
        println!("  max win         {:>10.2}", a.max_win);
        println!("  cascades/round  {:>10.3}", a.average_cascades());
        println!(
            "  features        {:>10} entries, {} retriggers",
            a.free_mode_entries, a.retriggers
        );
        println!("  pick bonuses    {:>10}", a.pick_bonuses);
    }
}

fn round_line(session: usize, n: usize, round: &RoundResult) -> String {
    let mut flags = Vec::new();
    if round.entered_free_mode {
        flags.push("FREE+");
    } else if round.retriggered() {
        flags.push("RETRIGGER");
    }
    if round.pick_bonus_triggered {
        flags.push("PICK");
    }
    if round.exited_free_mode {
        flags.push("FREE-");
    }
    let mode = match round.mode {
        GameMode::Base => "base",
        GameMode::Free => "free",
    };
    format!(
        "s{session} r{n:<5} {mode} {:<16} cascades {:>2} win {:>10.2} {}",
        round.outcome_id,
        round.cascade_count(),
        round.total_win,
        flags.join(" ")
    )
}

/// Read every trace line out of `run --stages` output
///
/// Lines that are not JSON objects (round and session text) are skipped.
pub fn parse_traces(text: &str) -> Result<Vec<StageTrace>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| line.trim_start().starts_with('{'))
        .map(|(n, line)| {
            StageTrace::from_json(line).with_context(|| format!("bad trace on line {}", n + 1))
        })
        .collect()
}

pub fn summary_line(summary: &TraceSummary) -> String {
    let mut line = format!(
        "{:<12} {:<16} events {:>3} {:>8.0} ms cascades {:>2} win {:>10.2}",
        summary.trace_id,
        summary.outcome_id,
        summary.event_count,
        summary.duration_ms,
        summary.cascade_count,
        summary.total_win
    );
    if summary.entered_free_mode {
        line.push_str(" FREE+");
    }
    if summary.pick_bonus {
        line.push_str(" PICK");
    }
    let categories: Vec<String> = summary
        .categories
        .iter()
        .map(|(category, count)| format!("{} {count}", category.display_name()))
        .collect();
    line.push_str(&format!(" [{}]", categories.join(", ")));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cf_engine::{OutcomeCatalog, Session, seeded};
    use cf_stage::TimingConfig;

    #[test]
    fn test_aggregate_merges_sessions() {
        let catalog = Arc::new(OutcomeCatalog::fallback(&mut seeded(1)));
        let reports: Vec<SessionReport> = (0..3usize)
            .map(|index| {
                let seed = index as u64;
                let mut session = Session::new(Arc::clone(&catalog), seed).with_autoplay(true);
                session.autoplay(10);
                SessionReport {
                    index,
                    seed,
                    stats: session.stats().clone(),
                    rounds: Vec::new(),
                    traces: Vec::new(),
                }
            })
            .collect();

        let report = SimulationReport::new(catalog.len(), reports);
        assert_eq!(report.aggregate.rounds, 30);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["catalog_outcomes"], 1);
        assert!(json["sessions"][0].get("rounds").is_none());
    }

    #[test]
    fn test_traces_read_back_from_run_output() {
        let catalog = Arc::new(OutcomeCatalog::fallback(&mut seeded(5)));
        let mut session = Session::new(catalog, 5);
        let round = session.spin();
        let trace = round.to_trace("s0-r0", TimingConfig::turbo());

        let output = format!(
            "{}\n{}\nsession   0 (seed 5): 1 rounds\n",
            round_line(0, 0, &round),
            serde_json::to_string(&trace).unwrap()
        );
        let traces = parse_traces(&output).unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].outcome_id, round.outcome_id);
        assert_eq!(traces[0].cascade_count(), round.cascade_count());

        let line = summary_line(&traces[0].summary());
        assert!(line.starts_with("s0-r0"));
        assert!(line.contains("Round Lifecycle"));
    }

    #[test]
    fn test_unordered_trace_is_rejected() {
        let catalog = Arc::new(OutcomeCatalog::fallback(&mut seeded(6)));
        let mut trace = Session::new(catalog, 6)
            .spin()
            .to_trace("s0-r0", TimingConfig::normal());
        trace.events.reverse();

        let output = format!("header\n{}\n", serde_json::to_string(&trace).unwrap());
        let err = parse_traces(&output).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
