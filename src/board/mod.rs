//! Board model: the fixed grid, tiles, and numbered-mode decay.
//!
//! ## Key Types
//!
//! - `Position`: Validated (x, y) coordinate
//! - `Tile`: One cell with its occupant, decay counter and last score
//! - `Board`: The grid; placement, removal, neighbor queries, decay
//! - `TileNumberGenerator`: Weighted decay counter source with fallback

pub mod grid;
pub mod numbering;

pub use grid::{Board, Position, Tile, TileMode, BOARD_SIZE, TILE_COUNT};
pub use numbering::TileNumberGenerator;
