//! Symbol grid and cell addressing

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Standard grid height
pub const STANDARD_ROWS: usize = 5;
/// Standard grid width
pub const STANDARD_COLS: usize = 5;

/// A cell address; orders row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Grid construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol code '{code}' at row {row}")]
    UnknownCode { row: usize, code: char },
}

/// Row-major matrix of symbols
///
/// Serialized as one string of symbol codes per row, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Symbol>,
}

impl Grid {
    /// Create a grid filled with one symbol
    pub fn new(rows: usize, cols: usize, fill: Symbol) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Create a standard 5×5 grid filled with one symbol
    pub fn standard(fill: Symbol) -> Self {
        Self::new(STANDARD_ROWS, STANDARD_COLS, fill)
    }

    /// Build from nested rows (top to bottom)
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, symbols) in rows.into_iter().enumerate() {
            if symbols.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: symbols.len(),
                });
            }
            cells.extend(symbols);
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Parse rows of symbol codes, e.g. `["AABCD", ...]`
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let symbols = line
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|code| Symbol::from_code(code).ok_or(GridError::UnknownCode { row, code }))
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(symbols);
        }
        Self::from_rows(parsed)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of a position
    pub fn index_of(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn get(&self, pos: Position) -> Option<Symbol> {
        if self.contains(pos) {
            Some(self.cells[self.index_of(pos)])
        } else {
            None
        }
    }

    /// Replace the symbol at `pos`; returns false if out of bounds
    pub fn set(&mut self, pos: Position, symbol: Symbol) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let idx = self.index_of(pos);
        self.cells[idx] = symbol;
        true
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// 4-directional neighbours clipped at the edges (down, up, right, left)
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let Position { row, col } = pos;
        let down = (row + 1 < self.rows).then(|| Position::new(row + 1, col));
        let up = row.checked_sub(1).map(|r| Position::new(r, col));
        let right = (col + 1 < self.cols).then(|| Position::new(row, col + 1));
        let left = col.checked_sub(1).map(|c| Position::new(row, c));
        [down, up, right, left].into_iter().flatten()
    }

    /// Count occurrences of a symbol
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|&&s| s == symbol).count()
    }

    /// Positions holding a symbol, row-major
    pub fn positions_of(&self, symbol: Symbol) -> Vec<Position> {
        self.positions().filter(|&p| self[p] == symbol).collect()
    }

    /// Column `col` from top to bottom
    pub fn column(&self, col: usize) -> Vec<Symbol> {
        (0..self.rows)
            .map(|row| self.cells[row * self.cols + col])
            .collect()
    }

    /// Nested rows, top to bottom
    pub fn to_rows(&self) -> Vec<Vec<Symbol>> {
        self.cells.chunks(self.cols).map(<[Symbol]>::to_vec).collect()
    }

    /// One code string per row, top to bottom
    pub fn row_strings(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|s| s.code()).collect())
            .collect()
    }
}

impl Index<Position> for Grid {
    type Output = Symbol;

    fn index(&self, pos: Position) -> &Symbol {
        &self.cells[self.index_of(pos)]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_strings().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.row_strings()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Grid::parse(&rows)
    }
}

/// Fixed-size bitset over the cells of one grid
#[derive(Debug, Clone)]
pub struct CellMask {
    cols: usize,
    words: Vec<u64>,
}

impl CellMask {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            words: vec![0; (rows * cols).div_ceil(64)],
        }
    }

    /// Mark a cell; returns true if it was not marked before
    pub fn insert(&mut self, pos: Position) -> bool {
        let (word, bit) = self.slot(pos);
        let was_set = self.words[word] & bit != 0;
        self.words[word] |= bit;
        !was_set
    }

    pub fn contains(&self, pos: Position) -> bool {
        let (word, bit) = self.slot(pos);
        self.words[word] & bit != 0
    }

    /// Number of marked cells
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn slot(&self, pos: Position) -> (usize, u64) {
        let idx = pos.row * self.cols + pos.col;
        (idx / 64, 1u64 << (idx % 64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let grid = Grid::parse(&["AB", "WS", "CD"]).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid[Position::new(1, 0)], Symbol::Wild);
        assert_eq!(grid.to_string(), "AB\nWS\nCD");
        assert_eq!(grid.column(1), vec![Symbol::B, Symbol::Scatter, Symbol::D]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Grid::parse::<&str>(&[]), Err(GridError::Empty));
        assert!(matches!(
            Grid::parse(&["AB", "A"]),
            Err(GridError::Ragged { row: 1, .. })
        ));
        assert_eq!(
            Grid::parse(&["AX"]),
            Err(GridError::UnknownCode { row: 0, code: 'X' })
        );
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = Grid::standard(Symbol::A);
        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);
        assert_eq!(grid.neighbors(Position::new(2, 2)).count(), 4);
        assert_eq!(grid.neighbors(Position::new(4, 4)).count(), 2);
    }

    #[test]
    fn test_serde_as_row_strings() {
        let grid = Grid::parse(&["AW", "SD"]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"["AW","SD"]"#);
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_cell_mask() {
        let mut mask = CellMask::new(9, 9);
        assert!(mask.insert(Position::new(8, 8)));
        assert!(!mask.insert(Position::new(8, 8)));
        assert!(mask.contains(Position::new(8, 8)));
        assert!(!mask.contains(Position::new(0, 0)));
        assert_eq!(mask.count(), 1);
    }
}
