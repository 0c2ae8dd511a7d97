//! Stages and the turn lifecycle.
//!
//! ## Key Types
//!
//! - [`StageDefinition`]: Turn count, target, draw policy and unlocks
//! - [`TurnController`]: Drives draw, place/remove and end-of-turn for one stage
//! - [`GamePhase`]: `Idle`, `Playing`, `Shop`, `GameOver`, `Victory`
//! - [`TurnData`]: The running turn as observers see it

mod controller;
mod definition;
mod turn;

pub use controller::{TurnContext, TurnController};
pub use definition::{DrawPolicy, StageDefinition, Unlock};
pub use turn::{GamePhase, TurnData, TurnOutcome};
