//! Card inventory: the owned deck, the active hand, and the exclusion
//! window that gates which active types can be selected.
//!
//! ## Key Types
//!
//! - `CardInventory`: Deck/hand state and shop swaps
//! - `OwnedCard`: One deck entry (type + copy count)
//! - `ExclusionHistory`: Types used in the most recent turns

pub mod history;
pub mod manager;

pub use history::ExclusionHistory;
pub use manager::{CardInventory, OwnedCard};
