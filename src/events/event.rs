//! Session notifications.
//!
//! Events are raised at the end of the command that caused them and
//! delivered in the order they were raised. They carry owned snapshots, so
//! an observer never holds a borrow into the engine.

use serde::{Deserialize, Serialize};

use crate::stage::{GamePhase, TurnData};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new turn began with this hand.
    TurnStarted(TurnData),
    /// The board total changed.
    ScoreUpdated(i32),
    /// Tiles changed (placement, removal, decay, clear, mode switch).
    BoardUpdated,
    /// The phase changed.
    GameStateChanged(GamePhase),
    /// The owned deck changed (unlock or shop swap).
    DeckChanged,
}

impl GameEvent {
    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::TurnStarted(_) => "turn_started",
            GameEvent::ScoreUpdated(_) => "score_updated",
            GameEvent::BoardUpdated => "board_updated",
            GameEvent::GameStateChanged(_) => "game_state_changed",
            GameEvent::DeckChanged => "deck_changed",
        }
    }
}
