//! Per-session spin history and summary

use serde::{Deserialize, Serialize};
use sv_reels::{PayTier, ReelOutcome};

use crate::gamble::GambleOutcome;

/// One settled spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    /// 1-based position in its session, 0 until recorded
    pub index: u32,
    pub outcome: ReelOutcome,
    pub tier: PayTier,
    pub bet: f64,
    /// Paytable winnings, before gamble and streak bonus
    pub winnings: f64,
    /// Gambles played on this spin, in order
    pub gambles: Vec<GambleOutcome>,
    /// Streak after this spin
    pub streak: u32,
    /// Streak bonus credited, 0 below the threshold
    pub streak_bonus: f64,
    /// Level after this spin
    pub level: u32,
    pub leveled_up: bool,
    /// Balance after everything above was applied
    pub balance: f64,
}

impl SpinRecord {
    pub fn is_win(&self) -> bool {
        self.winnings > 0.0
    }

    /// Balance change caused by this spin
    pub fn net(&self) -> f64 {
        self.winnings - self.bet + self.gamble_delta() + self.streak_bonus
    }

    /// Net balance change from all gambles on this spin
    pub fn gamble_delta(&self) -> f64 {
        self.gambles.iter().map(GambleOutcome::delta).sum()
    }
}

/// End-of-session report
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub spins: u32,
    pub wins: u32,
    pub total_bet: f64,
    /// Sum of paytable winnings; this is what gets folded into the stores
    pub total_winnings: f64,
    /// Winning spins over total spins, 0 for an empty session
    pub win_rate: f64,
    pub final_balance: f64,
    /// Level after the session was folded in
    pub level: u32,
    /// The fold raised the level
    pub leveled_up: bool,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.spins == 0
    }
}

/// Spins played in one session, in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    spins: Vec<SpinRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spin, assigning its position
    pub fn record(&mut self, mut spin: SpinRecord) -> &SpinRecord {
        spin.index = self.spins.len() as u32 + 1;
        self.spins.push(spin);
        &self.spins[self.spins.len() - 1]
    }

    pub fn spins(&self) -> &[SpinRecord] {
        &self.spins
    }

    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    pub fn total_bet(&self) -> f64 {
        self.spins.iter().map(|s| s.bet).sum()
    }

    pub fn total_winnings(&self) -> f64 {
        self.spins.iter().map(|s| s.winnings).sum()
    }

    /// Summarize against the player's balance and level at close
    pub fn summary(&self, final_balance: f64, level: u32) -> SessionSummary {
        let spins = self.spins.len() as u32;
        let wins = self.spins.iter().filter(|s| s.is_win()).count() as u32;
        let win_rate = if spins > 0 {
            wins as f64 / spins as f64
        } else {
            0.0
        };

        SessionSummary {
            spins,
            wins,
            total_bet: self.total_bet(),
            total_winnings: self.total_winnings(),
            win_rate,
            final_balance,
            level,
            leveled_up: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamble::CoinSide;

    fn spin(index: u32, bet: f64, winnings: f64) -> SpinRecord {
        SpinRecord {
            index,
            outcome: ReelOutcome::new(1, 2, 3),
            tier: PayTier::NoMatch,
            bet,
            winnings,
            gambles: Vec::new(),
            streak: 0,
            streak_bonus: 0.0,
            level: 1,
            leveled_up: false,
            balance: 0.0,
        }
    }

    #[test]
    fn test_empty_session_summary() {
        let summary = Session::new().summary(100.0, 1);
        assert!(summary.is_empty());
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.final_balance, 100.0);
    }

    #[test]
    fn test_summary_totals() {
        let mut session = Session::new();
        session.record(spin(1, 10.0, 0.0));
        session.record(spin(2, 10.0, 20.0));
        session.record(spin(3, 5.0, 0.0));
        session.record(spin(4, 5.0, 50.0));

        let summary = session.summary(155.0, 1);
        assert_eq!(summary.spins, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.total_bet, 30.0);
        assert_eq!(summary.total_winnings, 70.0);
        assert_eq!(summary.win_rate, 0.5);
    }

    #[test]
    fn test_record_assigns_positions() {
        let mut session = Session::new();
        session.record(spin(0, 1.0, 0.0));
        let second = session.record(spin(0, 1.0, 0.0));
        assert_eq!(second.index, 2);
        assert_eq!(session.spins()[0].index, 1);
    }

    #[test]
    fn test_net_includes_gamble_and_bonus() {
        let mut record = spin(1, 10.0, 20.0);
        record.gambles.push(GambleOutcome::Lost {
            flip: CoinSide::Tails,
            stake: 20.0,
        });
        record.streak_bonus = 10.0;
        assert_eq!(record.net(), 0.0);
    }

    #[test]
    fn test_net_sums_every_gamble() {
        // Win 20, double it, then lose the 40
        let mut record = spin(1, 10.0, 20.0);
        record.gambles = vec![
            GambleOutcome::Won {
                flip: CoinSide::Heads,
                stake: 20.0,
                new_stake: 40.0,
            },
            GambleOutcome::Lost {
                flip: CoinSide::Tails,
                stake: 40.0,
            },
        ];
        assert_eq!(record.gamble_delta(), -20.0);
        assert_eq!(record.net(), -10.0);
    }
}
