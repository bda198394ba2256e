//! Persistent player state

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One player's persistent economy state, keyed by name in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Current balance. Only a lost gamble can push it below zero.
    pub balance: f64,
    /// Cumulative spin winnings, folded in once per session
    #[serde(default)]
    pub total_won: f64,
    /// Completed sessions
    #[serde(default)]
    pub games: u32,
    /// Last calendar date a daily bonus was claimed
    #[serde(rename = "last_bonus", default, with = "bonus_date")]
    pub last_bonus_date: Option<NaiveDate>,
    #[serde(default = "first_level", deserialize_with = "whole_number")]
    pub level: u32,
    /// Consecutive winning spins
    #[serde(default)]
    pub streak: u32,
    /// Winnings of the most recent spin; the stake for a gamble
    #[serde(default)]
    pub last_win: f64,
}

impl PlayerRecord {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balance: starting_balance,
            total_won: 0.0,
            games: 0,
            last_bonus_date: None,
            level: 1,
            streak: 0,
            last_win: 0.0,
        }
    }

    /// Check if a daily bonus was already claimed on `date`
    pub fn claimed_bonus_on(&self, date: NaiveDate) -> bool {
        self.last_bonus_date == Some(date)
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Read-only view of a player for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub record: PlayerRecord,
}

fn first_level() -> u32 {
    1
}

/// Older save files store the level as a float (e.g. `2.0`)
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("invalid level {value}")));
    }
    Ok(value as u32)
}

/// `""` means never claimed; otherwise `YYYY-MM-DD`
mod bonus_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
