//! Cluster detection
//!
//! Breadth-first flood fill over 4-directional neighbours with an explicit
//! work queue and a bitset of visited cells. Works for any grid size.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{CellMask, Grid, Position};
use crate::symbols::Symbol;

/// Smallest region that pays
pub const MIN_CLUSTER_SIZE: usize = 4;

/// A connected region of matching cells with at least [`MIN_CLUSTER_SIZE`] cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Reported symbol; Wild only for all-Wild regions
    pub symbol: Symbol,
    /// Cells in flood-fill order, starting with the seed
    pub positions: Vec<Position>,
    pub size: usize,
}

impl Cluster {
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }
}

/// Find every qualifying cluster, in row-major seed order
pub fn find_clusters(grid: &Grid) -> Vec<Cluster> {
    let mut visited = CellMask::new(grid.rows(), grid.cols());
    let mut queue = VecDeque::new();
    let mut clusters = Vec::new();

    for seed in grid.positions() {
        if !visited.insert(seed) {
            continue;
        }
        let base = grid[seed];
        if base.is_scatter() {
            continue;
        }

        let mut cells = Vec::new();
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            cells.push(current);
            for next in grid.neighbors(current) {
                if visited.contains(next) || !base.matches(grid[next]) {
                    continue;
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }

        if cells.len() >= MIN_CLUSTER_SIZE {
            let symbol = if base.is_wild() {
                dominant_symbol(grid, &cells).unwrap_or(Symbol::Wild)
            } else {
                base
            };
            clusters.push(Cluster {
                symbol,
                size: cells.len(),
                positions: cells,
            });
        }
    }

    clusters
}

/// Most frequent paying symbol among `cells`
///
/// Counts are kept in first-seen order and only a strictly higher count
/// replaces the leader, so ties go to the symbol seen first.
fn dominant_symbol(grid: &Grid, cells: &[Position]) -> Option<Symbol> {
    let mut counts: Vec<(Symbol, usize)> = Vec::with_capacity(4);
    for &pos in cells {
        let symbol = grid[pos];
        if !symbol.is_paying() {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, n)) => *n += 1,
            None => counts.push((symbol, 1)),
        }
    }

    let mut best = None;
    let mut best_count = 0;
    for (symbol, n) in counts {
        if n > best_count {
            best_count = n;
            best = Some(symbol);
        }
    }
    best
}

/// Every position covered by `clusters`, deduplicated, row-major
pub fn winning_positions(clusters: &[Cluster]) -> Vec<Position> {
    let mut positions: Vec<Position> = clusters
        .iter()
        .flat_map(|c| c.positions.iter().copied())
        .collect();
    positions.sort_unstable();
    positions.dedup();
    positions
}
