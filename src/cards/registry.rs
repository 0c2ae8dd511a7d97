//! Card catalog for definition lookup.
//!
//! The `CardCatalog` maps each `CardType` to its base score and per-type
//! copy count. It is pure data: scoring rules live in `scoring`.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardType};
use super::instance::CardInstance;

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use tile_draft::cards::{CardCatalog, CardDefinition, CardType};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new(CardType::Robot, 7));
///
/// assert_eq!(catalog.base_score(CardType::Robot), Some(7));
/// assert!(catalog.get(CardType::Orc).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardType, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard twelve-type table.
    #[must_use]
    pub fn standard() -> Self {
        let table = [
            (CardType::Orc, 3, 2),
            (CardType::Werewolf, 2, 2),
            (CardType::Goblin, 0, 3),
            (CardType::Elf, 4, 2),
            (CardType::Dwarf, 2, 2),
            (CardType::Angel, 1, 2),
            (CardType::Dragon, 0, 1),
            (CardType::Devil, 3, 2),
            (CardType::Vampire, 1, 2),
            (CardType::Naga, 0, 2),
            (CardType::Robot, 7, 1),
            (CardType::Slime, 0, 3),
        ];

        table
            .into_iter()
            .map(|(t, base, copies)| CardDefinition::new(t, base).with_copies(copies))
            .collect()
    }

    /// Register a definition, replacing any previous entry for the type.
    ///
    /// Returns the replaced entry.
    pub fn register(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.card_type, card)
    }

    /// Get a definition by type.
    #[must_use]
    pub fn get(&self, card_type: CardType) -> Option<&CardDefinition> {
        self.cards.get(&card_type)
    }

    /// Base score for a type.
    #[must_use]
    pub fn base_score(&self, card_type: CardType) -> Option<i32> {
        self.get(card_type).map(|c| c.base_score)
    }

    /// Per-type copy count.
    #[must_use]
    pub fn copies(&self, card_type: CardType) -> Option<u32> {
        self.get(card_type).map(|c| c.copies)
    }

    /// Create a fresh instance of a type.
    #[must_use]
    pub fn instantiate(&self, card_type: CardType) -> Option<CardInstance> {
        self.get(card_type).map(CardInstance::from_definition)
    }

    /// Check if a type is registered.
    #[must_use]
    pub fn contains(&self, card_type: CardType) -> bool {
        self.cards.contains_key(&card_type)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions in rule-table order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        CardType::ALL.iter().filter_map(move |t| self.cards.get(t))
    }
}

impl FromIterator<CardDefinition> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.register(card);
        }
        catalog
    }
}
