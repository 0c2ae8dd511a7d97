//! # tile-draft
//!
//! Rules and scoring engine for a turn-based tile drafting game.
//!
//! Each turn the player draws a hand of typed cards from an owned deck and
//! places them on a 3x3 board. Every card scores by a rule specific to its
//! type, reading its neighbors and board-wide statistics. Stages run for a
//! fixed number of turns and are cleared by reaching a cumulative target;
//! between stages a shop swaps owned types under a unique-type cap.
//!
//! ## Design Principles
//!
//! 1. **One scoring path**: Tile scores and score breakdowns come from the
//!    same rule evaluation, so they cannot disagree.
//!
//! 2. **All-or-nothing commands**: A rejected placement, removal or swap
//!    leaves the session exactly as it was and says why.
//!
//! 3. **Explicit session**: No global state. A [`GameSession`] owns
//!    everything and observers receive events after each command.
//!
//! ## Architecture
//!
//! - **Deterministic RNG**: One seed, separate ChaCha8 streams for drawing
//!   hands and for tile numbers.
//!
//! - **Persistent Data Structures**: The owned deck is an `im::Vector`, so a
//!   shop swap can roll back to an O(1) snapshot.
//!
//! - **Non-destructive previews**: What-if scoring runs on a scratch board.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, error types
//! - `cards`: Card types, definitions, instances and the catalog
//! - `board`: Positions, tiles, the board and numbered-mode tile numbers
//! - `scoring`: The twelve scoring rules, breakdowns and previews
//! - `inventory`: Owned deck, active hand and exclusion history
//! - `stage`: Stage definitions and the turn controller
//! - `events`: Notifications and observers
//! - `session`: The game session

pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod inventory;
pub mod scoring;
pub mod session;
pub mod stage;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, DuplicatePolicy, EngineConfig, GameRng, PlayError, SwapError, TileNumberConfig,
    TileWeight,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardInstance, CardType};

pub use crate::board::{Board, Position, Tile, TileMode, TileNumberGenerator, BOARD_SIZE, TILE_COUNT};

pub use crate::scoring::{
    breakdown, calculate_all, preview_placement, preview_replacement, total_score, BoardPreview,
    GlobalScoreData, ScoreBreakdown, ScoreModifier,
};

pub use crate::inventory::{CardInventory, ExclusionHistory, OwnedCard};

pub use crate::stage::{
    DrawPolicy, GamePhase, StageDefinition, TurnContext, TurnController, TurnData, TurnOutcome, Unlock,
};

pub use crate::events::{EventBus, GameEvent, GameObserver, ObserverId, DEFAULT_LOG_CAPACITY};

pub use crate::session::GameSession;
