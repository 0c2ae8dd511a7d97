//! Error types.
//!
//! Low-level state (`Board`, `CardInventory`) reports failure with
//! `bool`/`Option`; the session turns rejected commands into `PlayError` so
//! callers can tell why a command did nothing.

use thiserror::Error;

use crate::board::Position;
use crate::cards::CardType;
use crate::stage::GamePhase;

/// Setup or integration errors in the supplied configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration defines no stages")]
    NoStages,

    #[error("stage {stage_id} is invalid: {reason}")]
    InvalidStage { stage_id: u32, reason: String },

    #[error("stage id {0} is defined more than once")]
    DuplicateStage(u32),

    #[error("card type {0} has no catalog entry")]
    MissingCatalogEntry(CardType),

    #[error("card type {0} has a catalog entry with zero copies")]
    ZeroCopies(CardType),

    #[error("tile number range {min}..={max} is empty")]
    InvalidTileNumbers { min: i32, max: i32 },

    #[error("starting deck has {unique} unique types, cap is {cap}")]
    StartingDeckTooLarge { unique: usize, cap: usize },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a shop swap was refused. The deck is unchanged in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("{0} is not in the deck")]
    NotOwned(CardType),

    #[error("{0} is already in the deck")]
    AlreadyOwned(CardType),

    #[error("deck index {index} out of range (deck has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} has no catalog entry")]
    UnknownType(CardType),

    #[error("swap would leave {unique} unique types, cap is {cap}")]
    CapExceeded { unique: usize, cap: usize },
}

/// A session command that was rejected without changing state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    #[error("command not allowed in phase {0:?}")]
    WrongPhase(GamePhase),

    #[error("position ({x}, {y}) is off the board")]
    InvalidPosition { x: usize, y: usize },

    #[error("tile {0} is already occupied")]
    TileOccupied(Position),

    #[error("tile {0} is empty")]
    TileEmpty(Position),

    #[error("card on tile {0} was not placed this turn")]
    NotRemovable(Position),

    #[error("no {0} card is available this turn")]
    CardUnavailable(CardType),

    #[error("{0} was used recently and cannot be selected")]
    CardNotSelectable(CardType),

    #[error("{0} has no catalog entry")]
    UnknownCard(CardType),

    #[error("unknown stage {0}")]
    UnknownStage(u32),

    #[error("stage {stage_id} cannot be played: {reason}")]
    InvalidStage { stage_id: u32, reason: String },

    #[error("no stage follows the current one")]
    NoNextStage,

    #[error("turn {turn} is past the stage's last turn {end_turn}")]
    TurnOutOfRange { turn: u32, end_turn: u32 },

    #[error("shop swap rejected: {0}")]
    Swap(#[from] SwapError),
}
