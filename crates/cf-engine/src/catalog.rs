//! Outcome catalog - weighted, pre-generated round definitions
//!
//! Loaded once per session and never mutated afterwards. Every outcome is
//! validated before any round is resolved from it.
//!
//! ## Wire format
//!
//! ```json
//! { "outcomes": [ {
//!     "id": "BASE_SMALL-0", "probability": 0.008, "mode": "BASE",
//!     "initialGrid": [["A","B","C","D","W"], ...5 rows],
//!     "multiplier": 1, "cascadeMultiplierBase": 1,
//!     "freeSpinsTriggerCount": 3, "freeSpinsAward": 0,
//!     "triggers": { "pickBonus": false },
//!     "payTable": { "A": { "4": 2, "5": 4 } }
//! } ] }
//! ```
//!
//! A bare array of outcome records is accepted as well. YAML uses the same shape.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, STANDARD_COLS, STANDARD_ROWS};
use crate::paytable::PayTable;
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// Game mode an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    #[serde(rename = "BASE")]
    Base,
    #[serde(rename = "FREE")]
    Free,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Base => "BASE",
            GameMode::Free => "FREE",
        }
    }
}

/// One validated, immutable outcome definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeDefinition {
    pub id: String,
    /// Relative selection weight, finite and > 0
    pub probability_weight: f64,
    pub initial_grid: Grid,
    pub mode: GameMode,
    /// Multiplier applied at cascade index 0
    pub base_multiplier: f64,
    /// Multiplier at cascade index k > 0 is `cascade_multiplier_base + k`
    pub cascade_multiplier_base: f64,
    /// Minimum scatters on the initial grid to award free spins
    pub free_spin_trigger_count: u32,
    pub free_spin_award: u32,
    pub pick_bonus_trigger: bool,
    pub pay_table: PayTable,
}

/// Validation failures; raised at load time, never mid-round
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("catalog contains no outcomes")]
    EmptyCatalog,

    #[error("outcome #{index} has an empty id")]
    MissingId { index: usize },

    #[error("duplicate outcome id '{0}'")]
    DuplicateId(String),

    #[error("outcome '{id}': probability must be finite and > 0, got {value}")]
    InvalidWeight { id: String, value: f64 },

    #[error("outcome '{id}': initialGrid must be {expected_rows}x{expected_cols}, got {detail}")]
    GridDimensions {
        id: String,
        expected_rows: usize,
        expected_cols: usize,
        detail: String,
    },

    #[error("outcome '{id}': {field} is not finite")]
    NonFinite { id: String, field: String },

    #[error("outcome '{id}': {field} must not be negative, got {value}")]
    Negative { id: String, field: String, value: f64 },

    #[error("malformed catalog data: {0}")]
    Shape(String),
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl CatalogError {
    /// True for read/syntax failures, where the synthetic fallback applies
    pub fn is_load_failure(&self) -> bool {
        matches!(self, CatalogError::Io(_) | CatalogError::Parse(_))
    }
}

/// Source document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Pick a format from a file extension; unknown extensions read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                CatalogFormat::Yaml
            }
            _ => CatalogFormat::Json,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

// The root is either `{ "outcomes": [...] }` or the bare list. Unwrapping happens
// on the generic value tree so integer paytable keys never go through a
// buffered untagged enum.

fn json_outcome_list(doc: serde_json::Value) -> serde_json::Value {
    match doc {
        serde_json::Value::Object(mut map) => map
            .remove("outcomes")
            .unwrap_or(serde_json::Value::Object(map)),
        other => other,
    }
}

fn yaml_outcome_list(doc: serde_yml::Value) -> serde_yml::Value {
    match doc {
        serde_yml::Value::Mapping(mut map) => map
            .remove("outcomes")
            .unwrap_or(serde_yml::Value::Mapping(map)),
        other => other,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TriggerRecord {
    #[serde(default, rename = "pickBonus")]
    pick_bonus: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeRecord {
    id: String,
    probability: f64,
    mode: GameMode,
    initial_grid: Vec<Vec<Symbol>>,
    multiplier: f64,
    cascade_multiplier_base: f64,
    free_spins_trigger_count: u32,
    free_spins_award: u32,
    #[serde(default)]
    triggers: TriggerRecord,
    #[serde(default)]
    pay_table: PayTable,
}

impl OutcomeRecord {
    fn validate(self) -> Result<OutcomeDefinition, ConfigurationError> {
        let id = self.id;

        if !self.probability.is_finite() || self.probability <= 0.0 {
            return Err(ConfigurationError::InvalidWeight {
                id,
                value: self.probability,
            });
        }

        let rows = self.initial_grid.len();
        let ragged = self
            .initial_grid
            .iter()
            .position(|row| row.len() != STANDARD_COLS);
        if rows != STANDARD_ROWS || ragged.is_some() {
            let detail = match ragged {
                Some(row) if rows == STANDARD_ROWS => {
                    format!("row {row} with {} cells", self.initial_grid[row].len())
                }
                _ => format!("{rows} rows"),
            };
            return Err(ConfigurationError::GridDimensions {
                id,
                expected_rows: STANDARD_ROWS,
                expected_cols: STANDARD_COLS,
                detail,
            });
        }
        let initial_grid = Grid::from_rows(self.initial_grid).map_err(|e| {
            ConfigurationError::GridDimensions {
                id: id.clone(),
                expected_rows: STANDARD_ROWS,
                expected_cols: STANDARD_COLS,
                detail: e.to_string(),
            }
        })?;

        Ok(OutcomeDefinition {
            id,
            probability_weight: self.probability,
            initial_grid,
            mode: self.mode,
            base_multiplier: self.multiplier,
            cascade_multiplier_base: self.cascade_multiplier_base,
            free_spin_trigger_count: self.free_spins_trigger_count,
            free_spin_award: self.free_spins_award,
            pick_bonus_trigger: self.triggers.pick_bonus,
            pay_table: self.pay_table,
        })
    }
}

/// Multipliers and every paytable entry must be finite and non-negative
fn check_amounts(outcome: &OutcomeDefinition) -> Result<(), ConfigurationError> {
    let id = outcome.id.as_str();
    check_amount(id, "multiplier", outcome.base_multiplier)?;
    check_amount(id, "cascadeMultiplierBase", outcome.cascade_multiplier_base)?;
    for (symbol, size, amount) in outcome.pay_table.iter() {
        check_amount(id, &format!("payTable[{symbol}][{size}]"), amount)?;
    }
    Ok(())
}

fn check_amount(id: &str, field: &str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite {
            id: id.to_string(),
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ConfigurationError::Negative {
            id: id.to_string(),
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable set of validated outcomes, in document order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCatalog {
    outcomes: Vec<OutcomeDefinition>,
}

impl OutcomeCatalog {
    /// Build from already-constructed definitions, applying the same validation as loading
    pub fn new(outcomes: Vec<OutcomeDefinition>) -> Result<Self, ConfigurationError> {
        if outcomes.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.iter().enumerate() {
            if outcome.id.is_empty() {
                return Err(ConfigurationError::MissingId { index });
            }
            if !seen.insert(outcome.id.as_str()) {
                return Err(ConfigurationError::DuplicateId(outcome.id.clone()));
            }
            let w = outcome.probability_weight;
            if !w.is_finite() || w <= 0.0 {
                return Err(ConfigurationError::InvalidWeight {
                    id: outcome.id.clone(),
                    value: w,
                });
            }
            let grid = &outcome.initial_grid;
            if grid.rows() != STANDARD_ROWS || grid.cols() != STANDARD_COLS {
                return Err(ConfigurationError::GridDimensions {
                    id: outcome.id.clone(),
                    expected_rows: STANDARD_ROWS,
                    expected_cols: STANDARD_COLS,
                    detail: format!("{}x{}", grid.rows(), grid.cols()),
                });
            }
            check_amounts(outcome)?;
        }

        Ok(Self { outcomes })
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let doc: serde_json::Value =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let records: Vec<OutcomeRecord> = serde_json::from_value(json_outcome_list(doc))
            .map_err(|e| ConfigurationError::Shape(e.to_string()))?;
        Self::from_records(records)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let doc: serde_yml::Value =
            serde_yml::from_str(yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let records: Vec<OutcomeRecord> = serde_yml::from_value(yaml_outcome_list(doc))
            .map_err(|e| ConfigurationError::Shape(e.to_string()))?;
        Self::from_records(records)
    }

    /// Parse and validate a document in the given format
    pub fn from_str_with(text: &str, format: CatalogFormat) -> Result<Self, CatalogError> {
        match format {
            CatalogFormat::Json => Self::from_json_str(text),
            CatalogFormat::Yaml => Self::from_yaml_str(text),
        }
    }

    /// Read, parse and validate a catalog file (format from extension)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_str_with(&text, CatalogFormat::from_path(path))?;
        log::info!(
            "Loaded outcome catalog from {}: {} outcomes",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Load a catalog, degrading to the synthetic fallback on read/parse failure
    ///
    /// Validation failures are never masked: a malformed catalog is a
    /// configuration error, not a load failure.
    pub fn load_or_fallback(
        path: impl AsRef<Path>,
        rng: &mut impl RandomSource,
    ) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => Ok(catalog),
            Err(CatalogError::Configuration(e)) => Err(e),
            Err(e) => {
                log::warn!(
                    "Outcome catalog {} unavailable ({}); using synthetic fallback",
                    path.display(),
                    e
                );
                Ok(Self::fallback(rng))
            }
        }
    }

    /// Single synthetic outcome: uniform random deal including Scatter
    pub fn fallback(rng: &mut impl RandomSource) -> Self {
        let mut grid = Grid::standard(Symbol::A);
        let positions: Vec<_> = grid.positions().collect();
        for pos in positions {
            let symbol = Symbol::DEAL_POOL[rng.next_index(Symbol::DEAL_POOL.len())];
            grid.set(pos, symbol);
        }

        Self {
            outcomes: vec![OutcomeDefinition {
                id: "fallback-1".to_string(),
                probability_weight: 1.0,
                initial_grid: grid,
                mode: GameMode::Base,
                base_multiplier: 1.0,
                cascade_multiplier_base: 1.0,
                free_spin_trigger_count: 3,
                free_spin_award: 8,
                pick_bonus_trigger: false,
                pay_table: PayTable::default_cluster(),
            }],
        }
    }

    fn from_records(records: Vec<OutcomeRecord>) -> Result<Self, CatalogError> {
        let outcomes = records
            .into_iter()
            .map(OutcomeRecord::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(outcomes)?)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// All outcomes in catalog order
    pub fn outcomes(&self) -> &[OutcomeDefinition] {
        &self.outcomes
    }

    pub fn get(&self, id: &str) -> Option<&OutcomeDefinition> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    /// Whether any outcome is defined for `mode`
    pub fn has_mode(&self, mode: GameMode) -> bool {
        self.outcomes.iter().any(|o| o.mode == mode)
    }

    /// Sum of weights of the outcomes a draw in `mode` would consider
    pub fn total_weight(&self, mode: GameMode) -> f64 {
        let filtered: f64 = self
            .outcomes
            .iter()
            .filter(|o| o.mode == mode)
            .map(|o| o.probability_weight)
            .sum();
        if self.has_mode(mode) {
            filtered
        } else {
            self.outcomes.iter().map(|o| o.probability_weight).sum()
        }
    }
}
