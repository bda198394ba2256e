//! Symbol definitions and the classic seven-symbol set

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};

/// A reel symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g., "Cherry", "Seven")
    pub name: String,
    /// Display glyph
    pub glyph: String,
    /// Bet multiplier paid when all three reels show this symbol
    pub multiplier: u32,
}

impl Symbol {
    /// Create a symbol
    pub fn new(id: u32, name: impl Into<String>, glyph: impl Into<String>, multiplier: u32) -> Self {
        Self {
            id,
            name: name.into(),
            glyph: glyph.into(),
            multiplier,
        }
    }
}

/// Immutable symbol table shared by the reel generator and the paytable.
///
/// Serialized as a plain list; deserializing runs the same validation as [`SymbolSet::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Build a validated symbol set
    pub fn new(symbols: Vec<Symbol>) -> ReelResult<Self> {
        if symbols.is_empty() {
            return Err(ReelError::EmptySymbolSet);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol.id) {
                return Err(ReelError::DuplicateSymbol { id: symbol.id });
            }
            if symbol.multiplier == 0 {
                return Err(ReelError::InvalidMultiplier {
                    name: symbol.name.clone(),
                    multiplier: symbol.multiplier,
                });
            }
        }

        Ok(Self { symbols })
    }

    /// The classic seven-symbol fruit machine set
    pub fn classic() -> Self {
        Self {
            symbols: vec![
                Symbol::new(1, "Cherry", "🍒", 8),
                Symbol::new(2, "Lemon", "🍋", 6),
                Symbol::new(3, "Bell", "🔔", 10),
                Symbol::new(4, "Diamond", "💎", 12),
                Symbol::new(5, "Seven", "7️⃣", 15),
                Symbol::new(6, "Clover", "🍀", 9),
                Symbol::new(7, "Spade", "♠", 7),
            ],
        }
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Symbol at a draw index
    pub fn by_index(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    /// Jackpot multiplier for a symbol ID
    pub fn multiplier(&self, id: u32) -> Option<u32> {
        self.get(id).map(|s| s.multiplier)
    }

    /// Glyph for a symbol ID, `"?"` when unknown
    pub fn glyph(&self, id: u32) -> &str {
        self.get(id).map(|s| s.glyph.as_str()).unwrap_or("?")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::classic()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolSet {
    type Error = ReelError;

    fn try_from(symbols: Vec<Symbol>) -> ReelResult<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<Symbol> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}
