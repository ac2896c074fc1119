//! Cascade collapse: remove, drop, refill

use crate::grid::{Grid, Position};
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// Produce the grid after removing `removed` and letting each column fall
///
/// Survivors keep their vertical order and settle at the bottom. Gaps at the
/// top are filled from [`Symbol::REFILL_POOL`], lowest gap first, columns left
/// to right. Out-of-bounds positions are ignored. The input grid is untouched.
pub fn collapse<R: RandomSource + ?Sized>(grid: &Grid, removed: &[Position], rng: &mut R) -> Grid {
    let rows = grid.rows();

    // None marks a removed cell; it never leaves this function
    let mut marked: Vec<Option<Symbol>> = grid.positions().map(|p| Some(grid[p])).collect();
    for &pos in removed {
        if grid.contains(pos) {
            marked[grid.index_of(pos)] = None;
        }
    }

    let mut next = grid.clone();
    let mut column = Vec::with_capacity(rows);
    for col in 0..grid.cols() {
        column.clear();
        // Bottom to top
        column.extend(
            (0..rows)
                .rev()
                .filter_map(|row| marked[grid.index_of(Position::new(row, col))]),
        );
        while column.len() < rows {
            column.push(refill_symbol(rng));
        }
        for (i, &symbol) in column.iter().enumerate() {
            next.set(Position::new(rows - 1 - i, col), symbol);
        }
    }
    next
}

fn refill_symbol<R: RandomSource + ?Sized>(rng: &mut R) -> Symbol {
    Symbol::REFILL_POOL[rng.next_index(Symbol::REFILL_POOL.len())]
}
