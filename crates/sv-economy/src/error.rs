//! Error types for the player economy

use std::path::PathBuf;

use sv_reels::ReelError;
use thiserror::Error;

/// Persistence failures. Always surfaced to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store contents could not be encoded or decoded
    #[error("Malformed store {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its allowed range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Economy rule errors
#[derive(Error, Debug)]
pub enum EconomyError {
    /// Player names must contain a non-whitespace character
    #[error("Player name is empty")]
    EmptyName,

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    /// Bet is zero, negative or not a number
    #[error("Invalid bet: {bet}")]
    InvalidBet { bet: f64 },

    #[error("Bet {bet:.2} exceeds balance {balance:.2}")]
    InsufficientBalance { bet: f64, balance: f64 },

    #[error("Spin count must be positive")]
    InvalidSpinCount,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reels(#[from] ReelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EconomyError {
    /// Validation failures leave state untouched; the caller skips or re-prompts
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::UnknownPlayer(_)
                | Self::InvalidBet { .. }
                | Self::InsufficientBalance { .. }
                | Self::InvalidSpinCount
        )
    }
}

/// Result type for economy operations
pub type EconomyResult<T> = Result<T, EconomyError>;
