//! Cumulative-winnings leaderboard

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::store::{Persistence, RecordStore};

/// A ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: u32,
    pub name: String,
    pub score: f64,
}

/// Player name to cumulative session winnings. Scores only ever grow.
pub struct LeaderboardStore {
    scores: RecordStore<f64>,
}

impl LeaderboardStore {
    pub fn open(backend: impl Persistence<f64> + 'static) -> StoreResult<Self> {
        Ok(Self {
            scores: RecordStore::open(backend)?,
        })
    }

    pub fn json_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self {
            scores: RecordStore::json_file(path)?,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            scores: RecordStore::in_memory(),
        }
    }

    /// Add a session's winnings. Negative and non-finite amounts are ignored.
    /// Returns the new score.
    pub fn add_score(&self, name: &str, amount: f64) -> StoreResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            log::warn!("Ignoring leaderboard amount {} for {}", amount, name);
            return Ok(self.score(name));
        }
        self.scores.upsert(
            name,
            || 0.0,
            |score| {
                *score += amount;
                *score
            },
        )
    }

    /// Current score, 0 for unknown players
    pub fn score(&self, name: &str) -> f64 {
        self.scores.get(name).unwrap_or(0.0)
    }

    /// Highest scores first, ties broken by name
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut ranked = self.scores.entries();
        ranked.sort_by(|(a_name, a), (b_name, b)| {
            b.partial_cmp(a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_name.cmp(b_name))
        });

        ranked
            .into_iter()
            .take(n)
            .enumerate()
            .map(|(i, (name, score))| LeaderboardEntry {
                rank: (i + 1) as u32,
                name,
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
