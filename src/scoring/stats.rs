//! Board-wide aggregates used by the scoring rules.

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::cards::CardType;

/// Aggregates recomputed once per scoring pass. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalScoreData {
    pub empty_tile_count: usize,
    pub per_type_count: FxHashMap<CardType, usize>,
    pub unique_type_count: usize,
    /// Unique types on the board, not counting `GlobalScoreData::DESIGNATED`.
    pub unique_type_count_excluding_designated: usize,
}

impl GlobalScoreData {
    /// The type left out of `unique_type_count_excluding_designated`.
    pub const DESIGNATED: CardType = CardType::Angel;

    /// Compute aggregates for a board in one pass over its tiles.
    #[must_use]
    pub fn compute(board: &Board) -> Self {
        let mut per_type_count: FxHashMap<CardType, usize> = FxHashMap::default();
        let mut empty_tile_count = 0;

        for tile in board.tiles() {
            match tile.occupant {
                Some(card) => *per_type_count.entry(card.card_type).or_default() += 1,
                None => empty_tile_count += 1,
            }
        }

        let unique_type_count = per_type_count.len();
        let unique_type_count_excluding_designated = per_type_count
            .keys()
            .filter(|&&t| t != Self::DESIGNATED)
            .count();

        Self {
            empty_tile_count,
            per_type_count,
            unique_type_count,
            unique_type_count_excluding_designated,
        }
    }

    /// Board-wide copies of a type.
    #[must_use]
    pub fn count(&self, card_type: CardType) -> usize {
        self.per_type_count.get(&card_type).copied().unwrap_or(0)
    }
}
