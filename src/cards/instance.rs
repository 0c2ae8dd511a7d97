//! Card instances - a card in play.
//!
//! A `CardInstance` is created fresh whenever a card enters play (drawn,
//! placed, or previewed). It copies the base score from the catalog at
//! construction time and has no identity beyond its type.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    pub card_type: CardType,
    pub base_score: i32,
}

impl CardInstance {
    #[must_use]
    pub const fn new(card_type: CardType, base_score: i32) -> Self {
        Self {
            card_type,
            base_score,
        }
    }

    /// Instantiate a catalog entry.
    #[must_use]
    pub fn from_definition(def: &CardDefinition) -> Self {
        Self::new(def.card_type, def.base_score)
    }
}
