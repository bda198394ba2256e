//! Error types for symbol set construction

use thiserror::Error;

/// Symbol set validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReelError {
    /// A reel needs at least one symbol to draw from
    #[error("Symbol set is empty")]
    EmptySymbolSet,

    /// Two symbols share an id
    #[error("Duplicate symbol id: {id}")]
    DuplicateSymbol { id: u32 },

    /// Jackpot multipliers must be at least 1
    #[error("Symbol {name} has invalid multiplier {multiplier}")]
    InvalidMultiplier { name: String, multiplier: u32 },
}

/// Result type for reel operations
pub type ReelResult<T> = Result<T, ReelError>;
