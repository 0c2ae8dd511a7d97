//! Deck and hand management.
//!
//! The `CardInventory` tracks a card type through its lifecycle:
//!
//! ```text
//! Locked -> Owned (deck) -> Active (hand) -> Selectable -> Used (on board)
//! ```
//!
//! - `owned` is the permanent deck, one entry per owned type with its copy
//!   count. It is an `im::Vector`, so a shop swap can snapshot it in O(1)
//!   and roll back if the swap breaks the unique-type cap.
//! - `active` is the multiset of card copies drawable this turn.
//! - The exclusion history blocks types used in recent turns from being
//!   selected when the stage asks for it.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::history::ExclusionHistory;
use crate::cards::{CardCatalog, CardInstance, CardType};
use crate::core::{DuplicatePolicy, GameRng, SwapError};
use crate::stage::StageDefinition;

/// One deck entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedCard {
    pub card_type: CardType,
    pub copies: u32,
}

/// Owned deck, active hand and exclusion history.
///
/// ## Usage
///
/// ```
/// use tile_draft::cards::{CardCatalog, CardType};
/// use tile_draft::core::{DuplicatePolicy, GameRng};
/// use tile_draft::inventory::CardInventory;
/// use tile_draft::stage::StageDefinition;
///
/// let catalog = CardCatalog::standard();
/// let mut inventory = CardInventory::new(7, 2, DuplicatePolicy::Skip);
/// inventory.add_to_deck(CardType::Goblin, &catalog);
///
/// let stage = StageDefinition::new(1, 3, 10);
/// let mut rng = GameRng::new(1);
/// let hand = inventory.activate_for_turn(1, &stage, &catalog, &mut rng);
///
/// // Goblin has three copies in the standard catalog
/// assert_eq!(hand.len(), 3);
/// assert!(inventory.try_use(CardType::Goblin));
/// assert_eq!(inventory.active_count(CardType::Goblin), 2);
/// ```
#[derive(Clone, Debug)]
pub struct CardInventory {
    owned: Vector<OwnedCard>,
    active: Vec<CardType>,
    history: ExclusionHistory,
    can_select: FxHashMap<CardType, bool>,
    exclusion_enabled: bool,
    unique_type_cap: usize,
    duplicate_policy: DuplicatePolicy,
}

impl CardInventory {
    #[must_use]
    pub fn new(unique_type_cap: usize, history_window: usize, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            owned: Vector::new(),
            active: Vec::new(),
            history: ExclusionHistory::new(history_window),
            can_select: FxHashMap::default(),
            exclusion_enabled: false,
            unique_type_cap,
            duplicate_policy,
        }
    }

    // === Deck ===

    /// The owned deck, in acquisition order.
    #[must_use]
    pub fn owned(&self) -> &Vector<OwnedCard> {
        &self.owned
    }

    /// Every owned copy, expanded.
    #[must_use]
    pub fn owned_cards(&self) -> Vec<CardType> {
        self.owned
            .iter()
            .flat_map(|o| std::iter::repeat(o.card_type).take(o.copies as usize))
            .collect()
    }

    /// Distinct owned types in acquisition order.
    #[must_use]
    pub fn owned_types(&self) -> Vec<CardType> {
        let mut seen = FxHashSet::default();
        self.owned
            .iter()
            .map(|o| o.card_type)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    #[must_use]
    pub fn is_owned(&self, card_type: CardType) -> bool {
        self.owned.iter().any(|o| o.card_type == card_type)
    }

    #[must_use]
    pub fn unique_type_count(&self) -> usize {
        self.owned
            .iter()
            .map(|o| o.card_type)
            .collect::<FxHashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn unique_type_cap(&self) -> usize {
        self.unique_type_cap
    }

    /// Replace the deck with `types`, one entry per listed type.
    ///
    /// Types missing from the catalog or beyond the cap are skipped.
    pub fn reset_deck(&mut self, types: &[CardType], catalog: &CardCatalog) {
        self.owned = Vector::new();
        for &card_type in types {
            self.add_to_deck(card_type, catalog);
        }
    }

    /// Add a type's catalog copies to the deck.
    ///
    /// Returns `false` (no mutation) if the type has no catalog entry, if it
    /// would exceed the unique-type cap, or if it is already owned under
    /// `DuplicatePolicy::Skip`.
    pub fn add_to_deck(&mut self, card_type: CardType, catalog: &CardCatalog) -> bool {
        let Some(copies) = catalog.copies(card_type) else {
            error!(%card_type, "add_to_deck: no catalog entry");
            return false;
        };

        if self.is_owned(card_type) {
            if self.duplicate_policy == DuplicatePolicy::Skip {
                debug!(%card_type, "add_to_deck: already owned, skipping");
                return false;
            }
        } else if self.unique_type_count() >= self.unique_type_cap {
            warn!(%card_type, cap = self.unique_type_cap, "add_to_deck: unique-type cap reached");
            return false;
        }

        self.owned.push_back(OwnedCard { card_type, copies });
        true
    }

    // === Shop ===

    /// Swap an owned type for an unowned one.
    ///
    /// Either the swap fully succeeds or the deck is left exactly as it was.
    pub fn replace_type(
        &mut self,
        out_type: CardType,
        in_type: CardType,
        catalog: &CardCatalog,
    ) -> Result<(), SwapError> {
        let index = self
            .owned
            .iter()
            .position(|o| o.card_type == out_type)
            .ok_or(SwapError::NotOwned(out_type))?;
        self.swap_entries(index, in_type, catalog, true)
    }

    /// Swap the deck entry at `index` for an unowned type.
    pub fn replace_type_at_index(
        &mut self,
        index: usize,
        in_type: CardType,
        catalog: &CardCatalog,
    ) -> Result<(), SwapError> {
        if index >= self.owned.len() {
            return Err(SwapError::IndexOutOfRange {
                index,
                len: self.owned.len(),
            });
        }
        self.swap_entries(index, in_type, catalog, false)
    }

    fn swap_entries(
        &mut self,
        index: usize,
        in_type: CardType,
        catalog: &CardCatalog,
        all_copies: bool,
    ) -> Result<(), SwapError> {
        if self.is_owned(in_type) {
            return Err(SwapError::AlreadyOwned(in_type));
        }
        let copies = catalog.copies(in_type).ok_or(SwapError::UnknownType(in_type))?;

        let snapshot = self.owned.clone();
        let out_type = self.owned[index].card_type;
        self.owned[index] = OwnedCard { card_type: in_type, copies };
        if all_copies {
            self.owned.retain(|o| o.card_type != out_type);
        }

        let unique = self.unique_type_count();
        if unique > self.unique_type_cap {
            self.owned = snapshot;
            warn!(%out_type, %in_type, unique, "swap rolled back: unique-type cap exceeded");
            return Err(SwapError::CapExceeded {
                unique,
                cap: self.unique_type_cap,
            });
        }

        debug!(%out_type, %in_type, "deck swap");
        Ok(())
    }

    // === Turn ===

    /// Forget the hand and history; set the stage's exclusion flag.
    pub fn begin_stage(&mut self, stage: &StageDefinition) {
        self.active.clear();
        self.can_select.clear();
        self.history.clear();
        self.exclusion_enabled = stage.exclude_previous_turn_types;
    }

    /// Drop every active card.
    pub fn clear_active(&mut self) {
        self.active.clear();
        self.can_select.clear();
    }

    /// Draw this turn's types into the hand.
    ///
    /// Picks `min(draw count, candidates)` distinct owned types at random,
    /// skipping recently used types when the stage excludes them (unless
    /// that would leave nothing to draw), and adds every catalog copy of each
    /// picked type to the active cards. Returns the whole hand.
    pub fn activate_for_turn(
        &mut self,
        turn: u32,
        stage: &StageDefinition,
        catalog: &CardCatalog,
        rng: &mut GameRng,
    ) -> Vec<CardInstance> {
        let draw_count = stage.draw_count(turn);
        let excluded = self.excluded_types();

        let mut pool = self.owned_types();
        if self.exclusion_enabled {
            let filtered: Vec<_> = pool.iter().copied().filter(|t| !excluded.contains(t)).collect();
            if filtered.is_empty() {
                debug!(turn, "exclusion would empty the pool; drawing from the full deck");
            } else {
                pool = filtered;
            }
        }

        rng.shuffle(&mut pool);
        pool.truncate(draw_count.min(pool.len()));

        for card_type in pool {
            match catalog.copies(card_type) {
                Some(copies) => self
                    .active
                    .extend(std::iter::repeat(card_type).take(copies as usize)),
                None => error!(%card_type, "activate_for_turn: no catalog entry"),
            }
        }

        self.refresh_selectable();
        self.hand(catalog)
    }

    /// Take one copy of a selectable active type.
    pub fn try_use(&mut self, card_type: CardType) -> bool {
        let Some(idx) = self.active.iter().position(|&t| t == card_type) else {
            debug!(%card_type, "try_use: not active");
            return false;
        };
        if !self.can_select(card_type) {
            debug!(%card_type, "try_use: excluded by recent use");
            return false;
        }
        self.active.remove(idx);
        if !self.active.contains(&card_type) {
            self.can_select.remove(&card_type);
        }
        true
    }

    /// Put one copy back into the hand.
    pub fn return_card(&mut self, card_type: CardType) {
        self.active.push(card_type);
        self.refresh_selectable();
    }

    /// Record the types used this turn.
    pub fn on_turn_end(&mut self, used: &FxHashSet<CardType>) {
        if self.exclusion_enabled && !used.is_empty() {
            self.history.push(used.clone());
        }
    }

    fn refresh_selectable(&mut self) {
        let excluded = self.excluded_types();
        self.can_select = self
            .active
            .iter()
            .map(|&t| (t, !excluded.contains(&t)))
            .collect();
    }

    // === Queries ===

    #[must_use]
    pub fn excluded_types(&self) -> FxHashSet<CardType> {
        if self.exclusion_enabled {
            self.history.excluded()
        } else {
            FxHashSet::default()
        }
    }

    #[must_use]
    pub fn can_select(&self, card_type: CardType) -> bool {
        self.can_select.get(&card_type).copied().unwrap_or(false)
    }

    /// Active copies in draw order.
    #[must_use]
    pub fn active(&self) -> &[CardType] {
        &self.active
    }

    #[must_use]
    pub fn active_count(&self, card_type: CardType) -> usize {
        self.active.iter().filter(|&&t| t == card_type).count()
    }

    /// Active copies as card instances.
    #[must_use]
    pub fn hand(&self, catalog: &CardCatalog) -> Vec<CardInstance> {
        self.active
            .iter()
            .filter_map(|&t| catalog.instantiate(t))
            .collect()
    }

    #[must_use]
    pub fn history(&self) -> &ExclusionHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_with(types: &[CardType]) -> (CardInventory, CardCatalog) {
        let catalog = CardCatalog::standard();
        let mut inventory = CardInventory::new(7, 2, DuplicatePolicy::Skip);
        inventory.reset_deck(types, &catalog);
        (inventory, catalog)
    }

    #[test]
    fn test_add_to_deck_skip_policy() {
        let (mut inventory, catalog) = inventory_with(&[]);
        assert!(inventory.add_to_deck(CardType::Orc, &catalog));
        assert!(!inventory.add_to_deck(CardType::Orc, &catalog));
        assert_eq!(inventory.owned().len(), 1);
        assert_eq!(inventory.owned_cards(), vec![CardType::Orc, CardType::Orc]);
    }

    #[test]
    fn test_add_to_deck_append_policy() {
        let catalog = CardCatalog::standard();
        let mut inventory = CardInventory::new(7, 2, DuplicatePolicy::Append);
        assert!(inventory.add_to_deck(CardType::Orc, &catalog));
        assert!(inventory.add_to_deck(CardType::Orc, &catalog));
        assert_eq!(inventory.owned_cards().len(), 4);
        assert_eq!(inventory.unique_type_count(), 1);
        assert_eq!(inventory.owned_types(), vec![CardType::Orc]);
    }

    #[test]
    fn test_add_to_deck_respects_cap() {
        let (mut inventory, catalog) = inventory_with(&CardType::ALL[..7]);
        assert_eq!(inventory.unique_type_count(), 7);
        assert!(!inventory.add_to_deck(CardType::Slime, &catalog));
        assert!(!inventory.is_owned(CardType::Slime));
    }

    #[test]
    fn test_add_to_deck_unknown_type() {
        let catalog = CardCatalog::new();
        let mut inventory = CardInventory::new(7, 2, DuplicatePolicy::Skip);
        assert!(!inventory.add_to_deck(CardType::Orc, &catalog));
    }

    #[test]
    fn test_activate_expands_copies() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Goblin, CardType::Robot]);
        let stage = StageDefinition::new(1, 3, 10);
        let mut rng = GameRng::new(4);

        let hand = inventory.activate_for_turn(1, &stage, &catalog, &mut rng);
        assert_eq!(hand.len(), 4);
        assert_eq!(inventory.active_count(CardType::Goblin), 3);
        assert_eq!(inventory.active_count(CardType::Robot), 1);
        assert!(inventory.can_select(CardType::Goblin));
        assert!(!inventory.can_select(CardType::Orc));
    }

    #[test]
    fn test_activate_limits_to_draw_count() {
        let (mut inventory, catalog) =
            inventory_with(&[CardType::Orc, CardType::Elf, CardType::Naga, CardType::Devil]);
        let stage = StageDefinition::new(1, 3, 10)
            .with_draw(crate::stage::DrawPolicy::new(2, 2, 2));
        let mut rng = GameRng::new(4);

        inventory.activate_for_turn(1, &stage, &catalog, &mut rng);
        let drawn: FxHashSet<_> = inventory.active().iter().copied().collect();
        assert_eq!(drawn.len(), 2);
    }

    #[test]
    fn test_try_use_and_return() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Robot]);
        let stage = StageDefinition::new(1, 3, 10);
        let mut rng = GameRng::new(4);
        inventory.activate_for_turn(1, &stage, &catalog, &mut rng);

        assert!(inventory.try_use(CardType::Robot));
        assert!(!inventory.try_use(CardType::Robot));
        assert!(!inventory.try_use(CardType::Orc));

        inventory.return_card(CardType::Robot);
        assert!(inventory.can_select(CardType::Robot));
        assert!(inventory.try_use(CardType::Robot));
    }

    #[test]
    fn test_last_copy_used_is_not_selectable() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Robot, CardType::Orc]);
        let stage = StageDefinition::new(1, 3, 10).with_draw(crate::stage::DrawPolicy::new(5, 5, 5));
        let mut rng = GameRng::new(4);
        inventory.activate_for_turn(1, &stage, &catalog, &mut rng);
        assert_eq!(inventory.active_count(CardType::Orc), 2);

        assert!(inventory.try_use(CardType::Robot));
        assert!(!inventory.can_select(CardType::Robot));

        // One Orc copy remains in the hand
        assert!(inventory.try_use(CardType::Orc));
        assert!(inventory.can_select(CardType::Orc));
        assert!(inventory.try_use(CardType::Orc));
        assert!(!inventory.can_select(CardType::Orc));
    }

    #[test]
    fn test_history_ignored_without_exclusion() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Orc]);
        let stage = StageDefinition::new(1, 3, 10);
        inventory.begin_stage(&stage);
        let mut rng = GameRng::new(4);

        inventory.on_turn_end(&[CardType::Orc].into_iter().collect());
        assert!(inventory.history().is_empty());

        inventory.activate_for_turn(2, &stage, &catalog, &mut rng);
        assert!(inventory.can_select(CardType::Orc));
    }

    #[test]
    fn test_exclusion_falls_back_to_full_pool() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Orc]);
        let stage = StageDefinition::new(1, 3, 10).with_exclusion(true);
        inventory.begin_stage(&stage);
        let mut rng = GameRng::new(4);

        inventory.on_turn_end(&[CardType::Orc].into_iter().collect());
        inventory.activate_for_turn(2, &stage, &catalog, &mut rng);

        // Drawn through the fallback, but still not selectable
        assert_eq!(inventory.active_count(CardType::Orc), 2);
        assert!(!inventory.can_select(CardType::Orc));
        assert!(!inventory.try_use(CardType::Orc));
        assert_eq!(inventory.active_count(CardType::Orc), 2);
    }

    #[test]
    fn test_replace_type() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Orc, CardType::Elf]);

        assert!(inventory.replace_type(CardType::Orc, CardType::Naga, &catalog).is_ok());
        assert_eq!(inventory.owned_types(), vec![CardType::Naga, CardType::Elf]);
        assert_eq!(inventory.owned()[0].copies, 2);
    }

    #[test]
    fn test_replace_type_validation_leaves_deck_unchanged() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Orc, CardType::Elf]);
        let before = inventory.owned().clone();

        assert_eq!(
            inventory.replace_type(CardType::Robot, CardType::Naga, &catalog),
            Err(SwapError::NotOwned(CardType::Robot))
        );
        assert_eq!(
            inventory.replace_type(CardType::Orc, CardType::Elf, &catalog),
            Err(SwapError::AlreadyOwned(CardType::Elf))
        );
        assert_eq!(
            inventory.replace_type(CardType::Orc, CardType::Naga, &CardCatalog::new()),
            Err(SwapError::UnknownType(CardType::Naga))
        );
        assert_eq!(
            inventory.replace_type_at_index(5, CardType::Naga, &catalog),
            Err(SwapError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(inventory.owned(), &before);
    }

    #[test]
    fn test_replace_type_at_index() {
        let (mut inventory, catalog) = inventory_with(&[CardType::Orc, CardType::Elf]);
        assert!(inventory.replace_type_at_index(1, CardType::Robot, &catalog).is_ok());
        assert_eq!(inventory.owned_types(), vec![CardType::Orc, CardType::Robot]);
        assert_eq!(inventory.owned()[1].copies, 1);
    }

    #[test]
    fn test_replace_type_removes_appended_duplicates() {
        let catalog = CardCatalog::standard();
        let mut inventory = CardInventory::new(7, 2, DuplicatePolicy::Append);
        inventory.add_to_deck(CardType::Orc, &catalog);
        inventory.add_to_deck(CardType::Elf, &catalog);
        inventory.add_to_deck(CardType::Orc, &catalog);

        inventory.replace_type(CardType::Orc, CardType::Naga, &catalog).unwrap();
        assert!(!inventory.is_owned(CardType::Orc));
        assert_eq!(inventory.owned().len(), 2);
    }

    #[test]
    fn test_swap_rolls_back_over_cap() {
        let catalog = CardCatalog::standard();
        // Cap lowered after the deck was built, so any swap leaves it over the cap
        let mut inventory = CardInventory::new(2, 2, DuplicatePolicy::Skip);
        inventory.reset_deck(&[CardType::Orc, CardType::Elf], &catalog);
        inventory.unique_type_cap = 1;
        let before = inventory.owned().clone();

        let result = inventory.replace_type(CardType::Orc, CardType::Naga, &catalog);
        assert_eq!(result, Err(SwapError::CapExceeded { unique: 2, cap: 1 }));
        assert_eq!(inventory.owned(), &before);
    }
}
