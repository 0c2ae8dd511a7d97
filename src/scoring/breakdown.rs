//! The scoring pass and per-tile breakdowns.
//!
//! `calculate_all` and `breakdown` both go through `evaluate_tile`, so a
//! breakdown's `final_score` is always the score the pass writes to the tile.

use serde::Serialize;
use smallvec::SmallVec;

use super::rules::{self, RuleContext};
use super::stats::GlobalScoreData;
use crate::board::{Board, Position};
use crate::cards::CardType;

/// One contribution to a tile's score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreModifier {
    /// Short label for the effect.
    pub description: &'static str,
    pub delta: i32,
    /// What on the board caused it.
    pub rationale: String,
}

pub(crate) type Modifiers = SmallVec<[ScoreModifier; 4]>;

/// Full account of one tile's score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub position: Position,
    pub card_type: CardType,
    pub base_score: i32,
    pub modifiers: Vec<ScoreModifier>,
    pub final_score: i32,
}

impl ScoreBreakdown {
    /// Sum of all modifier deltas.
    #[must_use]
    pub fn modifier_total(&self) -> i32 {
        self.modifiers.iter().map(|m| m.delta).sum()
    }
}

/// Score one tile against precomputed aggregates. `None` for empty tiles.
pub(crate) fn evaluate_tile(
    board: &Board,
    global: &GlobalScoreData,
    pos: Position,
) -> Option<ScoreBreakdown> {
    let tile = board.tile(pos)?;
    let card = tile.occupant?;

    let ctx = RuleContext {
        board,
        global,
        pos,
        card,
        placed_turn: tile.placed_turn,
    };
    let mut modifiers = Modifiers::new();
    rules::apply(&ctx, &mut modifiers);

    let final_score = card.base_score + modifiers.iter().map(|m| m.delta).sum::<i32>();
    Some(ScoreBreakdown {
        position: pos,
        card_type: card.card_type,
        base_score: card.base_score,
        modifiers: modifiers.into_vec(),
        final_score,
    })
}

/// Recompute every tile's `calculated_score`.
pub fn calculate_all(board: &mut Board) {
    let global = GlobalScoreData::compute(board);
    let scores: SmallVec<[(Position, i32); 9]> = Position::all()
        .map(|pos| {
            let score = evaluate_tile(board, &global, pos).map_or(0, |b| b.final_score);
            (pos, score)
        })
        .collect();

    for (pos, score) in scores {
        board.set_score(pos, score);
    }
}

/// Breakdown of one tile's score, `None` if the tile is empty or off-board.
#[must_use]
pub fn breakdown(board: &Board, pos: Position) -> Option<ScoreBreakdown> {
    let global = GlobalScoreData::compute(board);
    evaluate_tile(board, &global, pos)
}

/// Sum of `calculated_score` over occupied tiles.
#[must_use]
pub fn total_score(board: &Board) -> i32 {
    board.occupied_tiles().map(|t| t.calculated_score).sum()
}
