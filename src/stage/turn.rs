//! Per-turn data and the game phase.

use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;

/// Where the session is in its stage lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// No stage has been started yet.
    #[default]
    Idle,
    /// A stage is running; `turn` is the current turn number.
    Playing { turn: u32 },
    /// Between stages; the deck may be edited.
    Shop,
    /// The last stage played missed its target.
    GameOver,
    /// The last stage played met its target.
    Victory,
}

impl GamePhase {
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, GamePhase::Playing { .. })
    }

    /// `GameOver` and `Victory` only end through an explicit stage start.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Snapshot of the running turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnData {
    pub turn_number: u32,
    pub target_score: i32,
    /// The hand: every active copy.
    pub available_cards: Vec<CardInstance>,
    /// Board total as of the last placement or removal.
    pub current_turn_score: i32,
}

/// What `end_turn` led to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stage continues with this turn.
    NextTurn(TurnData),
    /// The stage ended with the target met.
    Victory { cumulative_score: i32, target_score: i32 },
    /// The stage ended short of the target.
    GameOver { cumulative_score: i32, target_score: i32 },
}
