//! Paytable and win calculation

use serde::{Deserialize, Serialize};

use crate::draw::ReelOutcome;
use crate::symbols::SymbolSet;

/// Multiplier paid on a matched pair
pub const DEFAULT_PAIR_MULTIPLIER: f64 = 2.0;

/// Multiplier used when a jackpot symbol is missing from the set
pub const FALLBACK_JACKPOT_MULTIPLIER: u32 = 10;

/// Payout tier reached by an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayTier {
    /// All three reels match
    Jackpot { symbol_id: u32, multiplier: u32 },
    /// Exactly two reels match
    Pair { symbol_id: u32 },
    /// Three distinct symbols
    NoMatch,
}

impl PayTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Jackpot { .. } => "Jackpot",
            Self::Pair { .. } => "Pair",
            Self::NoMatch => "No match",
        }
    }
}

/// Result of evaluating one outcome against a bet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub tier: PayTier,
    /// Amount credited back to the player (includes no stake return)
    pub winnings: f64,
}

impl Evaluation {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.winnings > 0.0
    }
}

/// Match-count paytable
#[derive(Debug, Clone)]
pub struct PayTable {
    symbols: SymbolSet,
    pair_multiplier: f64,
}

impl PayTable {
    /// Create a paytable with the standard pair multiplier
    pub fn new(symbols: SymbolSet) -> Self {
        Self::with_pair_multiplier(symbols, DEFAULT_PAIR_MULTIPLIER)
    }

    pub fn with_pair_multiplier(symbols: SymbolSet, pair_multiplier: f64) -> Self {
        Self {
            symbols,
            pair_multiplier,
        }
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn pair_multiplier(&self) -> f64 {
        self.pair_multiplier
    }

    /// Classify an outcome; three-of-a-kind is checked before pairs
    pub fn tier(&self, outcome: &ReelOutcome) -> PayTier {
        let counts = outcome.counts();

        if let Some(&(symbol_id, _)) = counts.iter().find(|(_, n)| *n == 3) {
            let multiplier = self
                .symbols
                .multiplier(symbol_id)
                .unwrap_or(FALLBACK_JACKPOT_MULTIPLIER);
            return PayTier::Jackpot {
                symbol_id,
                multiplier,
            };
        }

        // Three reels can hold at most one pair
        if let Some(&(symbol_id, _)) = counts.iter().find(|(_, n)| *n == 2) {
            return PayTier::Pair { symbol_id };
        }

        PayTier::NoMatch
    }

    /// Evaluate an outcome for a bet. Total over any bet; validation happens upstream.
    pub fn evaluate(&self, outcome: &ReelOutcome, bet: f64) -> Evaluation {
        let tier = self.tier(outcome);
        let winnings = match tier {
            PayTier::Jackpot { multiplier, .. } => bet * multiplier as f64,
            PayTier::Pair { .. } => bet * self.pair_multiplier,
            PayTier::NoMatch => 0.0,
        };
        Evaluation { tier, winnings }
    }

    /// Winnings only
    pub fn resolve(&self, outcome: &ReelOutcome, bet: f64) -> f64 {
        self.evaluate(outcome, bet).winnings
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::new(SymbolSet::classic())
    }
}
