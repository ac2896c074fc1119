//! Round resolution scenarios and properties
//!
//! Covers:
//! - Reference scenarios (single big cluster, scatter trigger, wild expansion, one-step round)
//! - Cluster detection properties over random grids
//! - Cascade collapse properties
//! - Weighted selection convergence
//! - Catalog loading, validation and fallback
//! - Free mode lifecycle through a session

use std::sync::Arc;

use approx::assert_relative_eq;
use cf_engine::{
    CatalogError, ConfigurationError, EngineConfig, FreeModeChange, FreeSpinState, GameMode, Grid,
    OutcomeCatalog, OutcomeDefinition, PayTable, Position, RandomSource, RoundObserver,
    ScriptedSource, Session, Symbol, collapse, expand_wilds, find_clusters, resolve_outcome,
    resolve_round, seeded, select,
};

const DEMO_JSON: &str = include_str!("../../cf-sim/catalogs/demo.json");
const DEMO_YAML: &str = include_str!("../../cf-sim/catalogs/demo.yaml");

// No two orthogonal neighbours share a symbol
const DEAD: [&str; 5] = ["ABCDA", "CDABC", "ABCDA", "CDABC", "ABCDA"];

fn outcome(id: &str, rows: &[&str]) -> OutcomeDefinition {
    OutcomeDefinition {
        id: id.to_string(),
        probability_weight: 1.0,
        initial_grid: Grid::parse(rows).unwrap(),
        mode: GameMode::Base,
        base_multiplier: 1.0,
        cascade_multiplier_base: 1.0,
        free_spin_trigger_count: 3,
        free_spin_award: 8,
        pick_bonus_trigger: false,
        pay_table: PayTable::default_cluster(),
    }
}

fn random_grid(rng: &mut impl RandomSource, rows: usize, cols: usize) -> Grid {
    let mut grid = Grid::new(rows, cols, Symbol::A);
    let positions: Vec<_> = grid.positions().collect();
    for pos in positions {
        grid.set(pos, Symbol::DEAL_POOL[rng.next_index(Symbol::DEAL_POOL.len())]);
    }
    grid
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCE SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_single_cluster_of_21() {
    let rows = ["BAAAB", "AAAAA", "AAAAA", "AAAAA", "BAAAB"];
    let grid = Grid::parse(&rows).unwrap();
    let clusters = find_clusters(&grid);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].symbol, Symbol::A);
    assert_eq!(clusters[0].size, 21);

    let mut o = outcome("scenario-a", &rows);
    o.base_multiplier = 3.0;
    let mut state = FreeSpinState::new();
    let result = resolve_outcome(&o, &mut state, &mut seeded(1), &EngineConfig::default());
    let first = &result.steps[0];
    assert_relative_eq!(first.win_amount, o.pay_table.pay(Symbol::A, 21) * 3.0);
    assert_relative_eq!(first.win_amount, 1950.0);
}

#[test]
fn test_scenario_scatter_trigger() {
    let three = ["SBCDA", "CSABC", "ABSDA", "CDABC", "ABCDA"];
    let mut state = FreeSpinState::new();
    let result = resolve_outcome(
        &outcome("three", &three),
        &mut state,
        &mut seeded(2),
        &EngineConfig::default(),
    );
    assert_eq!(result.scatter_count, 3);
    assert!(result.entered_free_mode);
    assert_eq!(result.free_spins_awarded, Some(8));
    assert!(state.in_free_mode);

    let two = ["SBCDA", "CSABC", "ABCDA", "CDABC", "ABCDA"];
    let mut state = FreeSpinState::new();
    let result = resolve_outcome(
        &outcome("two", &two),
        &mut state,
        &mut seeded(2),
        &EngineConfig::default(),
    );
    assert!(!result.entered_free_mode);
    assert_eq!(result.free_spins_awarded, None);
    assert!(!state.in_free_mode);
    assert_eq!(state.remaining_free_spins, 0);
}

#[test]
fn test_expanded_scatters_do_not_retrigger() {
    // The Wild at (0,1) covers the Scatters at (0,0) and (1,1)
    let rows = ["SWCDA", "CSABC", "ABSDA", "CDABC", "ABCDA"];
    let o = outcome("wild-beside-scatter", &rows);
    let config = EngineConfig::default().with_max_cascade_depth(10);

    let mut base = FreeSpinState::new();
    let result = resolve_outcome(&o, &mut base, &mut seeded(3), &config);
    assert_eq!(result.scatter_count, 3);
    assert!(result.entered_free_mode);

    let mut free = FreeSpinState {
        in_free_mode: true,
        remaining_free_spins: 2,
    };
    let result = resolve_outcome(&o, &mut free, &mut seeded(3), &config);
    assert_eq!(result.mode, GameMode::Free);
    assert_eq!(result.initial_grid.count(Symbol::Scatter), 1);
    assert_eq!(result.scatter_count, 1);
    assert_eq!(result.free_spins_awarded, None);
    assert!(!result.retriggered());
    assert_eq!(free.remaining_free_spins, 1);
}

#[test]
fn test_scenario_wild_expansion_plus_shape() {
    let mut rows: Vec<String> = DEAD.iter().map(|r| r.to_string()).collect();
    rows[2].replace_range(2..3, "W");
    let grid = Grid::parse(&rows).unwrap();
    let (expanded, changed) = expand_wilds(&grid);
    assert_eq!(changed, 4);

    let plus = [
        Position::new(2, 2),
        Position::new(1, 2),
        Position::new(3, 2),
        Position::new(2, 1),
        Position::new(2, 3),
    ];
    for pos in grid.positions() {
        if plus.contains(&pos) {
            assert_eq!(expanded[pos], Symbol::Wild, "{pos} should be Wild");
        } else {
            assert_eq!(expanded[pos], grid[pos], "{pos} should be untouched");
        }
    }
}

#[test]
fn test_scenario_one_step_round() {
    // A run of four on the top row; everything below is dead and the refill
    // of the top row is pinned to D C D C, which cannot connect
    let rows = ["AAAAB", "CDBCD", "ABCDA", "CDABC", "ABCDA"];
    let o = outcome("scenario-d", &rows);
    let mut rng = ScriptedSource::new(vec![0.0], vec![3, 2, 3, 2]);
    let mut state = FreeSpinState::new();
    let result = resolve_outcome(&o, &mut state, &mut rng, &EngineConfig::default());

    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].index, 0);
    assert_eq!(result.steps[0].applied_multiplier, o.base_multiplier);
    assert_relative_eq!(result.total_win, result.steps[0].cluster_win * o.base_multiplier);
    assert_relative_eq!(result.total_win, 2.0);
    assert_eq!(
        result.final_grid().row_strings()[0],
        "DCDCB",
        "refills land in the emptied top row"
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLUSTER PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_clusters_meet_minimum_and_are_disjoint() {
    let mut rng = seeded(1234);
    for _ in 0..500 {
        let grid = random_grid(&mut rng, 5, 5);
        let clusters = find_clusters(&grid);
        let mut seen = std::collections::HashSet::new();
        for cluster in &clusters {
            assert!(cluster.size >= 4);
            assert_eq!(cluster.size, cluster.positions.len());
            assert_ne!(cluster.symbol, Symbol::Scatter);
            for &pos in &cluster.positions {
                assert!(seen.insert(pos), "cell {pos} in two clusters");
                assert_ne!(grid[pos], Symbol::Scatter);
            }
        }
    }
}

#[test]
fn test_detection_handles_other_grid_sizes() {
    let mut rng = seeded(8);
    for (rows, cols) in [(1, 8), (3, 7), (9, 9), (12, 4)] {
        let grid = random_grid(&mut rng, rows, cols);
        for cluster in find_clusters(&grid) {
            assert!(cluster.positions.iter().all(|&p| grid.contains(p)));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CASCADE PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_collapse_preserves_shape_and_scatters() {
    let mut rng = seeded(99);
    for _ in 0..300 {
        let grid = random_grid(&mut rng, 5, 5);
        let removed: Vec<Position> = grid
            .positions()
            .filter(|_| rng.next_unit() < 0.3)
            .collect();
        let next = collapse(&grid, &removed, &mut rng);

        assert_eq!(next.rows(), grid.rows());
        assert_eq!(next.cols(), grid.cols());
        assert_eq!(next.len(), grid.len());

        // Surviving scatters fall; none are created
        let kept_scatters = grid
            .positions_of(Symbol::Scatter)
            .into_iter()
            .filter(|p| !removed.contains(p))
            .count();
        assert_eq!(next.count(Symbol::Scatter), kept_scatters);
    }
}

#[test]
fn test_collapse_with_nothing_removed_is_idempotent() {
    let mut rng = seeded(5);
    for _ in 0..50 {
        let grid = random_grid(&mut rng, 5, 5);
        let once = collapse(&grid, &[], &mut rng);
        let twice = collapse(&once, &[], &mut rng);
        assert_eq!(once, grid);
        assert_eq!(twice, grid);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_selection_returns_catalog_members() {
    let catalog = OutcomeCatalog::from_json_str(DEMO_JSON).unwrap();
    let mut rng = seeded(3);
    for mode in [GameMode::Base, GameMode::Free] {
        for _ in 0..200 {
            let picked = select(&catalog, mode, &mut rng);
            assert!(catalog.outcomes().iter().any(|o| std::ptr::eq(o, picked)));
            assert_eq!(picked.mode, mode);
        }
    }
}

#[test]
fn test_selection_frequency_converges() {
    let catalog = OutcomeCatalog::from_json_str(DEMO_JSON).unwrap();
    let total = catalog.total_weight(GameMode::Base);
    let draws = 200_000;
    let mut rng = seeded(2024);

    let mut counts = std::collections::HashMap::new();
    for _ in 0..draws {
        *counts.entry(select(&catalog, GameMode::Base, &mut rng).id.clone()).or_insert(0u32) += 1;
    }

    for outcome in catalog.outcomes().iter().filter(|o| o.mode == GameMode::Base) {
        let expected = outcome.probability_weight / total;
        let observed = f64::from(counts.get(&outcome.id).copied().unwrap_or(0)) / draws as f64;
        assert!(
            (observed - expected).abs() < 0.01,
            "{}: observed {observed}, expected {expected}",
            outcome.id
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WILD EXPANSION IN CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_expansion_only_in_free_mode() {
    let mut rng = seeded(77);
    for _ in 0..100 {
        let grid = random_grid(&mut rng, 5, 5);
        let mut o = outcome("x", &DEAD);
        o.initial_grid = grid.clone();
        o.free_spin_trigger_count = 99;

        let mut base = FreeSpinState::new();
        let result = resolve_outcome(&o, &mut base, &mut rng, &EngineConfig::default());
        assert_eq!(result.initial_grid, grid);
        assert_eq!(result.wilds_expanded, 0);

        let mut free = FreeSpinState {
            in_free_mode: true,
            remaining_free_spins: 5,
        };
        let result = resolve_outcome(&o, &mut free, &mut rng, &EngineConfig::default());
        let (expected, _) = expand_wilds(&grid);
        assert_eq!(result.initial_grid, expected);

        // Every changed cell borders an original Wild
        for pos in grid.positions() {
            if result.initial_grid[pos] != grid[pos] {
                assert!(grid.neighbors(pos).any(|n| grid[n] == Symbol::Wild));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_demo_catalogs_load() {
    let json = OutcomeCatalog::from_json_str(DEMO_JSON).unwrap();
    assert_eq!(json.len(), 7);
    assert!(json.has_mode(GameMode::Free));
    assert!(json.get("BASE_PICK-0").is_some_and(|o| o.pick_bonus_trigger));

    let yaml = OutcomeCatalog::from_yaml_str(DEMO_YAML).unwrap();
    assert_eq!(yaml.len(), 3);
    assert_eq!(yaml.get("FREE_WILD-0").map(|o| o.mode), Some(GameMode::Free));
}

#[test]
fn test_validation_fails_fast() {
    let bad_grid = DEMO_JSON.replacen(r#"["A", "B", "C", "D", "A"],"#, r#"["A", "B", "C", "D"],"#, 1);
    assert!(matches!(
        OutcomeCatalog::from_json_str(&bad_grid),
        Err(CatalogError::Configuration(ConfigurationError::GridDimensions { .. }))
    ));

    let negative = DEMO_JSON.replacen(r#""probability": 0.5"#, r#""probability": -0.5"#, 1);
    assert!(matches!(
        OutcomeCatalog::from_json_str(&negative),
        Err(CatalogError::Configuration(ConfigurationError::InvalidWeight { .. }))
    ));

    let negative_multiplier = DEMO_JSON.replacen(r#""multiplier": 1"#, r#""multiplier": -1"#, 1);
    assert!(matches!(
        OutcomeCatalog::from_json_str(&negative_multiplier),
        Err(CatalogError::Configuration(ConfigurationError::Negative { .. }))
    ));
}

#[test]
fn test_load_or_fallback() {
    let mut rng = seeded(10);
    let catalog = OutcomeCatalog::load_or_fallback("does/not/exist.yaml", &mut rng).unwrap();
    assert_eq!(catalog.len(), 1);
    let fallback = &catalog.outcomes()[0];
    assert_eq!(fallback.id, "fallback-1");
    assert_eq!(fallback.free_spin_award, 8);
    assert_eq!(fallback.pay_table, PayTable::default_cluster());

    // The fallback is playable in both modes
    let mut state = FreeSpinState {
        in_free_mode: true,
        remaining_free_spins: 1,
    };
    let result = resolve_round(&catalog, &mut state, &mut rng, &EngineConfig::default());
    assert_eq!(result.outcome_id, "fallback-1");
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION AND OBSERVERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Transitions {
    changes: Vec<FreeModeChange>,
    completed: u32,
}

impl RoundObserver for Transitions {
    fn on_free_mode_changed(&mut self, change: FreeModeChange) {
        self.changes.push(change);
    }

    fn on_round_complete(&mut self, _total_win: f64) {
        self.completed += 1;
    }
}

#[test]
fn test_free_mode_enter_and_exit_through_session() {
    let catalog = Arc::new(OutcomeCatalog::from_yaml_str(DEMO_YAML).unwrap());
    let mut session = Session::new(catalog, 31).with_autoplay(true);
    let mut observer = Transitions::default();

    let results = session.autoplay(200);
    for result in &results {
        result.replay(&mut observer);
    }

    assert_eq!(observer.completed as usize, results.len());
    let entered = observer
        .changes
        .iter()
        .filter(|&&c| c == FreeModeChange::Entered)
        .count();
    assert!(entered > 0, "30% trigger weight over 200 rounds");
    // Entries and exits alternate, starting with an entry
    for pair in observer.changes.chunks(2) {
        assert_eq!(pair[0], FreeModeChange::Entered);
        if let Some(&exit) = pair.get(1) {
            assert_eq!(exit, FreeModeChange::Exited);
        }
    }
    // Award of 5 includes the triggering round: 4 free rounds per feature
    let free_rounds = results.iter().filter(|r| r.mode == GameMode::Free).count();
    let exits = observer
        .changes
        .iter()
        .filter(|&&c| c == FreeModeChange::Exited)
        .count();
    assert!(free_rounds >= exits * 4);
}

#[test]
fn test_parallel_sessions_are_reproducible() {
    let catalog = Arc::new(OutcomeCatalog::from_json_str(DEMO_JSON).unwrap());
    let run = |seed| {
        let catalog = Arc::clone(&catalog);
        std::thread::spawn(move || {
            let mut session = Session::new(catalog, seed).with_autoplay(true);
            session.autoplay(100);
            session.stats().clone()
        })
    };
    let a = run(5).join().unwrap();
    let b = run(5).join().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.rounds, 100);
}
