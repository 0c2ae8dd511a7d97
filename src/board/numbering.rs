//! Numbered-mode tile numbers.
//!
//! A tile number is a decay counter: a card on a tile survives that many
//! end-of-turn decays before it is destroyed. New numbers come from a
//! weighted pool in which every value has a cap on how many tiles may carry
//! it at once. When every capped value is saturated the generator falls
//! back to a uniform choice over the whole range.

use smallvec::SmallVec;

use crate::core::{GameRng, TileNumberConfig};

/// Weighted tile number source with per-value caps.
#[derive(Clone, Debug, Default)]
pub struct TileNumberGenerator {
    config: TileNumberConfig,
}

impl TileNumberGenerator {
    #[must_use]
    pub fn new(config: TileNumberConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TileNumberConfig {
        &self.config
    }

    /// Values still eligible for the weighted pool, with their weights.
    ///
    /// `existing` are the numbers currently on the board.
    #[must_use]
    pub fn weighted_pool(&self, existing: &[i32]) -> SmallVec<[(i32, u32); 8]> {
        self.config
            .weights
            .iter()
            .filter(|w| w.weight > 0)
            .filter(|w| existing.iter().filter(|&&n| n == w.value).count() < w.cap)
            .map(|w| (w.value, w.weight))
            .collect()
    }

    /// Draw a fresh number given the numbers currently on the board.
    pub fn generate(&self, existing: &[i32], rng: &mut GameRng) -> i32 {
        let pool = self.weighted_pool(existing);
        let weights: SmallVec<[u32; 8]> = pool.iter().map(|&(_, w)| w).collect();

        match rng.choose_weighted(&weights) {
            Some(idx) => pool[idx].0,
            None => rng.gen_inclusive(self.config.min..=self.config.max),
        }
    }
}
