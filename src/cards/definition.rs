//! Card definitions - static card data.
//!
//! `CardType` is the closed set of creatures a player can draft. A
//! `CardDefinition` holds the immutable catalog data for one type: its base
//! score and how many copies enter the deck when the type is owned.
//!
//! Instance data (which tile, which turn) lives elsewhere; two instances of
//! the same type are interchangeable.

use serde::{Deserialize, Serialize};

/// Card type. Used as a map key throughout the engine.
///
/// The declaration order is the rule-table order (Orc is rule A, Slime is
/// rule L).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    Orc,
    Werewolf,
    Goblin,
    Elf,
    Dwarf,
    Angel,
    Dragon,
    Devil,
    Vampire,
    Naga,
    Robot,
    Slime,
}

impl CardType {
    /// Number of card types.
    pub const COUNT: usize = 12;

    /// Every card type in rule-table order.
    pub const ALL: [CardType; Self::COUNT] = [
        CardType::Orc,
        CardType::Werewolf,
        CardType::Goblin,
        CardType::Elf,
        CardType::Dwarf,
        CardType::Angel,
        CardType::Dragon,
        CardType::Devil,
        CardType::Vampire,
        CardType::Naga,
        CardType::Robot,
        CardType::Slime,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Orc => "Orc",
            CardType::Werewolf => "Werewolf",
            CardType::Goblin => "Goblin",
            CardType::Elf => "Elf",
            CardType::Dwarf => "Dwarf",
            CardType::Angel => "Angel",
            CardType::Dragon => "Dragon",
            CardType::Devil => "Devil",
            CardType::Vampire => "Vampire",
            CardType::Naga => "Naga",
            CardType::Robot => "Robot",
            CardType::Slime => "Slime",
        }
    }

    /// Parse a display name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static catalog entry for one card type.
///
/// ## Example
///
/// ```
/// use tile_draft::cards::{CardDefinition, CardType};
///
/// let robot = CardDefinition::new(CardType::Robot, 7).with_copies(1);
/// assert_eq!(robot.base_score, 7);
/// assert_eq!(robot.copies, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// The type this entry describes.
    pub card_type: CardType,

    /// Score before any rule applies.
    pub base_score: i32,

    /// Copies added to the deck (and to the hand when drawn).
    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_copies() -> u32 {
    1
}

impl CardDefinition {
    /// Create a definition with a single copy.
    #[must_use]
    pub fn new(card_type: CardType, base_score: i32) -> Self {
        Self {
            card_type,
            base_score,
            copies: default_copies(),
        }
    }

    /// Set the per-type copy count (builder pattern).
    #[must_use]
    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }
}
