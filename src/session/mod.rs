//! Session orchestration.
//!
//! [`GameSession`] wires the board, catalog, scoring, inventory and turn
//! controller into one object and is the only type most callers need.

mod manager;

pub use manager::GameSession;
