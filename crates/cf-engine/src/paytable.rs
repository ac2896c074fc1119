//! Cluster paytable: symbol → cluster size → payout units

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Per-symbol, per-cluster-size payout schedule
///
/// Missing (symbol, size) entries pay 0. Wild- and Scatter-labelled clusters
/// normally have no entries, or all-zero ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayTable {
    entries: BTreeMap<Symbol, BTreeMap<u32, f64>>,
}

impl PayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payout for a cluster of `size` cells labelled `symbol`
    pub fn pay(&self, symbol: Symbol, size: usize) -> f64 {
        let Ok(size) = u32::try_from(size) else {
            return 0.0;
        };
        self.entries
            .get(&symbol)
            .and_then(|sizes| sizes.get(&size))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set one entry
    pub fn set(&mut self, symbol: Symbol, size: u32, amount: f64) {
        self.entries.entry(symbol).or_default().insert(size, amount);
    }

    /// Builder: set a whole row for a symbol
    pub fn with_row(mut self, symbol: Symbol, row: &[(u32, f64)]) -> Self {
        let sizes = self.entries.entry(symbol).or_default();
        for &(size, amount) in row {
            sizes.insert(size, amount);
        }
        self
    }

    /// All entries as (symbol, size, amount)
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u32, f64)> + '_ {
        self.entries.iter().flat_map(|(&symbol, sizes)| {
            sizes.iter().map(move |(&size, &amount)| (symbol, size, amount))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// Documented default paytable used by the fallback outcome
    pub fn default_cluster() -> Self {
        const AB: [f64; 22] = [
            2.0, 4.0, 6.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 80.0, 100.0, 140.0, 190.0, 250.0,
            320.0, 400.0, 500.0, 650.0, 800.0, 1000.0, 1200.0, 1500.0,
        ];
        const C: [f64; 22] = [
            3.0, 5.0, 8.0, 12.0, 18.0, 24.0, 36.0, 50.0, 70.0, 90.0, 120.0, 160.0, 220.0, 280.0,
            360.0, 460.0, 580.0, 720.0, 880.0, 1060.0, 1280.0, 1600.0,
        ];
        const D: [f64; 22] = [
            4.0, 6.0, 9.0, 14.0, 20.0, 28.0, 40.0, 60.0, 80.0, 100.0, 140.0, 180.0, 240.0, 320.0,
            420.0, 540.0, 700.0, 860.0, 1040.0, 1260.0, 1500.0, 1800.0,
        ];

        // Sizes 4..=25 map onto the 22 columns above
        let row = |values: &[f64; 22]| -> Vec<(u32, f64)> {
            (4u32..).zip(values.iter().copied()).collect()
        };

        Self::new()
            .with_row(Symbol::A, &row(&AB))
            .with_row(Symbol::B, &row(&AB))
            .with_row(Symbol::C, &row(&C))
            .with_row(Symbol::D, &row(&D))
            .with_row(Symbol::Wild, &[(4, 0.0), (5, 0.0)])
            .with_row(Symbol::Scatter, &[(4, 0.0), (5, 0.0)])
    }
}
