//! # cf-engine - ClusterForge round resolution
//!
//! Resolves cluster-pay cascading rounds from a weighted catalog of
//! pre-generated outcomes. Each round is computed in full, synchronously:
//!
//! ```text
//! select outcome → deal → wild expansion (free mode) → scatter trigger
//!   → [find clusters → pay → collapse + refill]* → pick bonus → settle
//! ```
//!
//! The result is an ordered list of [`CascadeStep`]s that presentation layers
//! replay at their own pace, either through a [`RoundObserver`] or as
//! `cf-stage` events.
//!
//! ## Determinism
//!
//! Randomness is always injected through [`RandomSource`]. Given the same
//! catalog, state and seed, a round resolves identically.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cf_engine::{OutcomeCatalog, Session, seeded};
//!
//! # fn main() -> Result<(), cf_engine::ConfigurationError> {
//! let mut rng = seeded(42);
//! let catalog = OutcomeCatalog::load_or_fallback("outcomes.json", &mut rng)?;
//! let mut session = Session::new(Arc::new(catalog), 42);
//! let result = session.spin();
//! println!("won {} over {} cascades", result.total_win, result.cascade_count());
//! # Ok(())
//! # }
//! ```

pub mod cascade;
pub mod catalog;
pub mod cluster;
pub mod config;
pub mod events;
pub mod free_spins;
pub mod grid;
pub mod payout;
pub mod paytable;
pub mod resolver;
pub mod rng;
pub mod selector;
pub mod session;
pub mod stages;
pub mod symbols;

pub use cascade::collapse;
pub use catalog::{
    CatalogError, CatalogFormat, ConfigurationError, GameMode, OutcomeCatalog, OutcomeDefinition,
};
pub use cluster::{Cluster, MIN_CLUSTER_SIZE, find_clusters, winning_positions};
pub use config::EngineConfig;
pub use events::{EventLog, RoundObserver};
pub use free_spins::{FreeModeChange, FreeSpinState, expand_wilds};
pub use grid::{CellMask, Grid, GridError, Position, STANDARD_COLS, STANDARD_ROWS};
pub use payout::{applied_multiplier, cluster_win, payout};
pub use paytable::PayTable;
pub use resolver::{CascadeStep, RoundResult, resolve_outcome, resolve_round};
pub use rng::{RandomSource, ScriptedSource, seeded};
pub use selector::select;
pub use session::{Session, SessionStats};
pub use stages::StageRecorder;
pub use symbols::Symbol;
