//! What-if previews for a hypothetical placement.
//!
//! A preview scores a scratch copy of the board before and after
//! substituting the hypothetical card. The caller's board is never
//! borrowed mutably, so it is scoring-identical before and after the call.

use serde::Serialize;

use super::breakdown::{breakdown, calculate_all, total_score, ScoreBreakdown};
use crate::board::{Board, Position, TILE_COUNT};
use crate::cards::CardInstance;

/// Score impact of a hypothetical placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardPreview {
    pub position: Position,
    pub card: CardInstance,
    /// Per-tile scores before, row-major.
    pub before: [i32; TILE_COUNT],
    /// Per-tile scores after, row-major.
    pub after: [i32; TILE_COUNT],
    pub total_before: i32,
    pub total_after: i32,
    /// How the previewed card itself would score.
    pub placed: Option<ScoreBreakdown>,
}

impl BoardPreview {
    /// Change in the board total.
    #[must_use]
    pub fn delta(&self) -> i32 {
        self.total_after - self.total_before
    }

    /// Change in one tile's score.
    #[must_use]
    pub fn tile_delta(&self, pos: Position) -> i32 {
        self.after[pos.index()] - self.before[pos.index()]
    }
}

fn run(board: &Board, pos: Position, card: CardInstance, turn: u32, replace: bool) -> Option<BoardPreview> {
    let mut scratch = board.clone();
    calculate_all(&mut scratch);
    let before = scratch.scores();
    let total_before = total_score(&scratch);

    if replace {
        scratch.remove(pos, turn)?;
    }
    if !scratch.place(pos, card, turn) {
        return None;
    }

    calculate_all(&mut scratch);
    Some(BoardPreview {
        position: pos,
        card,
        before,
        after: scratch.scores(),
        total_before,
        total_after: total_score(&scratch),
        placed: breakdown(&scratch, pos),
    })
}

/// Preview placing `card` on an empty tile at `turn`.
///
/// `None` if the tile is occupied.
#[must_use]
pub fn preview_placement(board: &Board, pos: Position, card: CardInstance, turn: u32) -> Option<BoardPreview> {
    if !board.tile(pos)?.is_empty() {
        return None;
    }
    run(board, pos, card, turn, false)
}

/// Preview swapping the card on an occupied tile that is removable at
/// `turn` for `card`.
#[must_use]
pub fn preview_replacement(board: &Board, pos: Position, card: CardInstance, turn: u32) -> Option<BoardPreview> {
    if !board.tile(pos)?.is_removable(turn) {
        return None;
    }
    run(board, pos, card, turn, true)
}
