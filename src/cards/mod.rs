//! Card system: types, definitions, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `CardType`: Closed enumeration of the twelve drafting creatures
//! - `CardDefinition`: Base score and per-type copy count
//! - `CardInstance`: A card in play (type + base score)
//! - `CardCatalog`: Definition lookup by type

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardType};
pub use instance::CardInstance;
pub use registry::CardCatalog;
