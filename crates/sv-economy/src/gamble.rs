//! Double-or-nothing coin flip on the last spin's winnings

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coin face, used both as the player's call and the flip result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    /// Fair flip
    pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::Heads
        } else {
            Self::Tails
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heads => write!(f, "heads"),
            Self::Tails => write!(f, "tails"),
        }
    }
}

/// Anything other than heads/tails
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid coin call: {0:?} (expected heads or tails)")]
pub struct ParseCoinSideError(pub String);

impl FromStr for CoinSide {
    type Err = ParseCoinSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heads" | "h" => Ok(Self::Heads),
            "tails" | "t" => Ok(Self::Tails),
            _ => Err(ParseCoinSideError(s.to_string())),
        }
    }
}

/// Result of a gamble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GambleOutcome {
    /// `last_win` was zero; nothing changed
    NothingToGamble,
    /// Call matched: balance gained `stake`, and the stake doubled
    Won {
        flip: CoinSide,
        stake: f64,
        new_stake: f64,
    },
    /// Call missed: balance lost `stake`, and the stake reset to zero
    Lost { flip: CoinSide, stake: f64 },
}

impl GambleOutcome {
    /// Net balance change
    pub fn delta(&self) -> f64 {
        match self {
            Self::NothingToGamble => 0.0,
            Self::Won { stake, .. } => *stake,
            Self::Lost { stake, .. } => -*stake,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Self::Won { .. })
    }
}

/// Apply a resolved flip to a balance and stake.
///
/// The stake must be positive. A loss may leave the balance negative.
pub(crate) fn settle_gamble(
    balance: &mut f64,
    last_win: &mut f64,
    call: CoinSide,
    flip: CoinSide,
) -> GambleOutcome {
    if *last_win <= 0.0 || last_win.is_nan() {
        return GambleOutcome::NothingToGamble;
    }

    let stake = *last_win;
    if call == flip {
        *balance += stake;
        *last_win += stake;
        GambleOutcome::Won {
            flip,
            stake,
            new_stake: *last_win,
        }
    } else {
        *balance -= stake;
        *last_win = 0.0;
        GambleOutcome::Lost { flip, stake }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_calls() {
        assert_eq!("heads".parse::<CoinSide>(), Ok(CoinSide::Heads));
        assert_eq!(" Tails ".parse::<CoinSide>(), Ok(CoinSide::Tails));
        assert_eq!("H".parse::<CoinSide>(), Ok(CoinSide::Heads));
        assert!("edge".parse::<CoinSide>().is_err());
    }

    #[test]
    fn test_matching_call_doubles_stake() {
        let (mut balance, mut last_win) = (190.0, 40.0);
        let outcome = settle_gamble(&mut balance, &mut last_win, CoinSide::Heads, CoinSide::Heads);
        assert_eq!(balance, 230.0);
        assert_eq!(last_win, 80.0);
        assert_eq!(outcome.delta(), 40.0);
        assert!(outcome.is_win());
    }

    #[test]
    fn test_missed_call_claws_back_stake() {
        let (mut balance, mut last_win) = (190.0, 40.0);
        let outcome = settle_gamble(&mut balance, &mut last_win, CoinSide::Heads, CoinSide::Tails);
        assert_eq!(balance, 150.0);
        assert_eq!(last_win, 0.0);
        assert_eq!(outcome.delta(), -40.0);
    }

    #[test]
    fn test_loss_can_go_negative() {
        let (mut balance, mut last_win) = (10.0, 40.0);
        settle_gamble(&mut balance, &mut last_win, CoinSide::Tails, CoinSide::Heads);
        assert_eq!(balance, -30.0);
    }

    #[test]
    fn test_no_stake_is_noop() {
        let (mut balance, mut last_win) = (50.0, 0.0);
        let outcome = settle_gamble(&mut balance, &mut last_win, CoinSide::Heads, CoinSide::Heads);
        assert_eq!(outcome, GambleOutcome::NothingToGamble);
        assert_eq!(outcome.delta(), 0.0);
        assert_eq!(balance, 50.0);
    }

    #[test]
    fn test_flip_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(99);
        let heads = (0..10_000)
            .filter(|_| CoinSide::flip(&mut rng) == CoinSide::Heads)
            .count();
        assert!((4_700..5_300).contains(&heads), "heads = {heads}");
    }
}
