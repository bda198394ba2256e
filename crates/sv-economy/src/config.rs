//! Economy and storage configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sv_reels::DEFAULT_PAIR_MULTIPLIER;

use crate::error::ConfigError;

/// Top-level game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub storage: StorageConfig,
}

impl GameConfig {
    /// Load from a JSON file; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.economy.validate()?;
        Ok(config)
    }
}

/// Rules that govern balances, streaks and levels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Balance granted to a new player
    pub starting_balance: f64,
    /// Cumulative winnings per level
    pub level_step: f64,
    /// Minimum streak that pays a streak bonus
    pub streak_bonus_threshold: u32,
    /// Bonus paid per streak length
    pub streak_bonus_per_win: f64,
    /// Daily bonus range (inclusive)
    pub daily_bonus_min: u32,
    pub daily_bonus_max: u32,
    /// Bet multiplier on a matched pair
    pub pair_multiplier: f64,
    /// Entries shown on the leaderboard
    pub leaderboard_size: usize,
    pub achievements: AchievementThresholds,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100.0,
            level_step: 200.0,
            streak_bonus_threshold: 2,
            streak_bonus_per_win: 5.0,
            daily_bonus_min: 20,
            daily_bonus_max: 100,
            pair_multiplier: DEFAULT_PAIR_MULTIPLIER,
            leaderboard_size: 10,
            achievements: AchievementThresholds::default(),
        }
    }
}

impl EconomyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.starting_balance.is_finite() && self.starting_balance > 0.0) {
            return Err(ConfigError::Invalid {
                field: "starting_balance",
                reason: format!("must be positive, got {}", self.starting_balance),
            });
        }
        if !(self.level_step.is_finite() && self.level_step > 0.0) {
            return Err(ConfigError::Invalid {
                field: "level_step",
                reason: format!("must be positive, got {}", self.level_step),
            });
        }
        if !(self.streak_bonus_per_win.is_finite() && self.streak_bonus_per_win >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "streak_bonus_per_win",
                reason: format!("must be non-negative, got {}", self.streak_bonus_per_win),
            });
        }
        if self.daily_bonus_min > self.daily_bonus_max {
            return Err(ConfigError::Invalid {
                field: "daily_bonus_min",
                reason: format!(
                    "{} is above daily_bonus_max {}",
                    self.daily_bonus_min, self.daily_bonus_max
                ),
            });
        }
        if !(self.pair_multiplier.is_finite() && self.pair_multiplier >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "pair_multiplier",
                reason: format!("must be non-negative, got {}", self.pair_multiplier),
            });
        }
        Ok(())
    }

    /// Level implied by cumulative winnings, saturating at `u32::MAX`
    pub fn level_for(&self, total_won: f64) -> u32 {
        let steps = (total_won.max(0.0) / self.level_step).floor();
        (1.0 + steps).min(u32::MAX as f64) as u32
    }
}

/// Achievement unlock thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementThresholds {
    pub frequent_spinner_games: u32,
    pub lucky_star_total_won: f64,
    pub high_roller_balance: f64,
}

impl Default for AchievementThresholds {
    fn default() -> Self {
        Self {
            frequent_spinner_games: 5,
            lucky_star_total_won: 500.0,
            high_roller_balance: 1000.0,
        }
    }
}

/// Where the player and leaderboard files live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub players_file: String,
    pub leaderboard_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            players_file: "players.json".to_string(),
            leaderboard_file: "leaderboard.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(&self.players_file)
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.data_dir.join(&self.leaderboard_file)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spinvault"))
        .unwrap_or_else(|| PathBuf::from("."))
}
