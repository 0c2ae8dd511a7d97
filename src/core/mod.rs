//! Core engine types: RNG, configuration, errors.
//!
//! Callers configure the engine via `EngineConfig` rather than modifying
//! the rule code.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{DuplicatePolicy, EngineConfig, TileNumberConfig, TileWeight};
pub use error::{ConfigError, PlayError, SwapError};
pub use rng::GameRng;
