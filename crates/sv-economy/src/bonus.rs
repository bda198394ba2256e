//! Daily bonus and achievements

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AchievementThresholds;
use crate::player::PlayerRecord;

/// Result of a daily bonus claim
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyBonus {
    Claimed { amount: f64, balance: f64 },
    /// Already taken on this date; nothing changed
    AlreadyClaimed { date: NaiveDate },
}

impl DailyBonus {
    pub fn amount(&self) -> f64 {
        match self {
            Self::Claimed { amount, .. } => *amount,
            Self::AlreadyClaimed { .. } => 0.0,
        }
    }
}

/// Credit `amount` and stamp `date`, unless already claimed on `date`
pub(crate) fn apply_daily_bonus(record: &mut PlayerRecord, date: NaiveDate, amount: f64) -> DailyBonus {
    if record.claimed_bonus_on(date) {
        return DailyBonus::AlreadyClaimed { date };
    }
    record.balance += amount;
    record.last_bonus_date = Some(date);
    DailyBonus::Claimed {
        amount,
        balance: record.balance,
    }
}

/// Milestones derived from a player record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// Enough completed sessions
    FrequentSpinner,
    /// Enough cumulative winnings
    LuckyStar,
    /// Balance above the high-roller line
    HighRoller,
}

impl Achievement {
    pub const ALL: [Achievement; 3] = [Self::FrequentSpinner, Self::LuckyStar, Self::HighRoller];

    pub fn title(&self) -> &'static str {
        match self {
            Self::FrequentSpinner => "Frequent Spinner",
            Self::LuckyStar => "Lucky Star",
            Self::HighRoller => "High Roller",
        }
    }

    pub fn is_unlocked(&self, record: &PlayerRecord, thresholds: &AchievementThresholds) -> bool {
        match self {
            Self::FrequentSpinner => record.games >= thresholds.frequent_spinner_games,
            Self::LuckyStar => record.total_won >= thresholds.lucky_star_total_won,
            Self::HighRoller => record.balance >= thresholds.high_roller_balance,
        }
    }
}

/// Unlocked achievements, in display order
pub fn achievements(record: &PlayerRecord, thresholds: &AchievementThresholds) -> Vec<Achievement> {
    Achievement::ALL
        .into_iter()
        .filter(|a| a.is_unlocked(record, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_bonus_once_per_day() {
        let mut record = PlayerRecord::new(100.0);
        let first = apply_daily_bonus(&mut record, date(1), 40.0);
        assert_eq!(
            first,
            DailyBonus::Claimed {
                amount: 40.0,
                balance: 140.0
            }
        );

        let second = apply_daily_bonus(&mut record, date(1), 75.0);
        assert_eq!(second, DailyBonus::AlreadyClaimed { date: date(1) });
        assert_eq!(second.amount(), 0.0);
        assert_eq!(record.balance, 140.0);
    }

    #[test]
    fn test_bonus_available_next_day() {
        let mut record = PlayerRecord::new(100.0);
        apply_daily_bonus(&mut record, date(1), 20.0);
        apply_daily_bonus(&mut record, date(2), 20.0);
        assert_eq!(record.balance, 140.0);
        assert_eq!(record.last_bonus_date, Some(date(2)));
    }

    #[test]
    fn test_no_achievements_for_new_player() {
        let record = PlayerRecord::new(100.0);
        assert!(achievements(&record, &AchievementThresholds::default()).is_empty());
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let mut record = PlayerRecord::new(1000.0);
        record.games = 5;
        record.total_won = 500.0;
        let unlocked = achievements(&record, &AchievementThresholds::default());
        assert_eq!(unlocked, Achievement::ALL.to_vec());
        let titles: Vec<_> = unlocked.iter().map(Achievement::title).collect();
        assert_eq!(titles, ["Frequent Spinner", "Lucky Star", "High Roller"]);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut record = PlayerRecord::new(50.0);
        record.games = 1;
        let thresholds = AchievementThresholds {
            frequent_spinner_games: 1,
            ..Default::default()
        };
        assert_eq!(achievements(&record, &thresholds), vec![Achievement::FrequentSpinner]);
    }
}
