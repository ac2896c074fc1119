//! Symbol definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid symbol
///
/// Serialized as its one-character code (`A`, `B`, `C`, `D`, `W`, `S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    A,
    B,
    C,
    D,
    /// Matches every other symbol when forming clusters
    #[serde(rename = "W")]
    Wild,
    /// Never joins clusters; counted for the free-spin trigger
    #[serde(rename = "S")]
    Scatter,
}

impl Symbol {
    /// Symbols a cascade may drop in. Scatter only ever comes from the initial deal.
    pub const REFILL_POOL: [Symbol; 5] = [Symbol::A, Symbol::B, Symbol::C, Symbol::D, Symbol::Wild];

    /// Symbols a synthetic deal draws from
    pub const DEAL_POOL: [Symbol; 6] = [
        Symbol::A,
        Symbol::B,
        Symbol::C,
        Symbol::D,
        Symbol::Wild,
        Symbol::Scatter,
    ];

    /// One-character code
    pub fn code(self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
            Symbol::C => 'C',
            Symbol::D => 'D',
            Symbol::Wild => 'W',
            Symbol::Scatter => 'S',
        }
    }

    /// Parse a one-character code
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Symbol::A),
            'B' => Some(Symbol::B),
            'C' => Some(Symbol::C),
            'D' => Some(Symbol::D),
            'W' => Some(Symbol::Wild),
            'S' => Some(Symbol::Scatter),
            _ => None,
        }
    }

    pub fn is_wild(self) -> bool {
        self == Symbol::Wild
    }

    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    /// Regular paying symbol (neither Wild nor Scatter)
    pub fn is_paying(self) -> bool {
        !matches!(self, Symbol::Wild | Symbol::Scatter)
    }

    /// Whether `other` may join a region seeded by `self`
    pub fn matches(self, other: Symbol) -> bool {
        if other.is_scatter() {
            return false;
        }
        self == other || self.is_wild() || other.is_wild()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
