//! Random reel draw

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::symbols::SymbolSet;

/// Number of reels on the machine
pub const REEL_COUNT: usize = 3;

/// Symbol IDs shown on the three reels, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelOutcome(pub [u32; REEL_COUNT]);

impl ReelOutcome {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    pub fn symbols(&self) -> &[u32; REEL_COUNT] {
        &self.0
    }

    /// Occurrence count per distinct symbol, in first-seen order
    pub fn counts(&self) -> Vec<(u32, u8)> {
        let mut counts: Vec<(u32, u8)> = Vec::with_capacity(REEL_COUNT);
        for &id in &self.0 {
            match counts.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, n)) => *n += 1,
                None => counts.push((id, 1)),
            }
        }
        counts
    }

    /// Render with the set's glyphs, e.g. `🍒 | 🍒 | 🔔`
    pub fn display(&self, symbols: &SymbolSet) -> String {
        self.0
            .iter()
            .map(|&id| symbols.glyph(id))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Draws reel outcomes uniformly, with replacement, from a symbol set
pub struct ReelGenerator {
    symbols: SymbolSet,
    rng: ChaCha8Rng,
}

impl ReelGenerator {
    /// Create a generator seeded from the OS
    pub fn new(symbols: SymbolSet) -> Self {
        Self {
            symbols,
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Create a reproducible generator
    pub fn seeded(symbols: SymbolSet, seed: u64) -> Self {
        Self {
            symbols,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reseed in place
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Draw one outcome; each reel is independent
    pub fn draw(&mut self) -> ReelOutcome {
        let mut reels = [0u32; REEL_COUNT];
        for reel in &mut reels {
            let idx = self.rng.random_range(0..self.symbols.len());
            // idx is always in range; SymbolSet is never empty
            *reel = self.symbols.by_index(idx).map(|s| s.id).unwrap_or_default();
        }
        log::trace!("Drew reels {:?}", reels);
        ReelOutcome(reels)
    }
}
