//! Sliding window of recently used card types.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::cards::CardType;

/// Types used in each of the last `window` turns, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ExclusionHistory {
    window: usize,
    turns: VecDeque<FxHashSet<CardType>>,
}

impl ExclusionHistory {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            turns: VecDeque::with_capacity(window + 1),
        }
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Record one turn's used types. Empty sets are not recorded.
    pub fn push(&mut self, used: FxHashSet<CardType>) {
        if used.is_empty() {
            return;
        }
        self.turns.push_back(used);
        while self.turns.len() > self.window {
            self.turns.pop_front();
        }
    }

    /// Union of every recorded turn.
    #[must_use]
    pub fn excluded(&self) -> FxHashSet<CardType> {
        self.turns.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, card_type: CardType) -> bool {
        self.turns.iter().any(|t| t.contains(&card_type))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(types: &[CardType]) -> FxHashSet<CardType> {
        types.iter().copied().collect()
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut history = ExclusionHistory::new(2);
        history.push(set(&[CardType::Orc]));
        history.push(set(&[CardType::Elf]));
        assert!(history.contains(CardType::Orc));

        history.push(set(&[CardType::Naga]));
        assert_eq!(history.len(), 2);
        assert!(!history.contains(CardType::Orc));
        assert_eq!(history.excluded(), set(&[CardType::Elf, CardType::Naga]));
    }

    #[test]
    fn test_empty_turns_are_skipped() {
        let mut history = ExclusionHistory::new(2);
        history.push(set(&[CardType::Orc]));
        history.push(FxHashSet::default());
        history.push(FxHashSet::default());
        assert!(history.contains(CardType::Orc));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_window_records_nothing() {
        let mut history = ExclusionHistory::new(0);
        history.push(set(&[CardType::Orc]));
        assert!(history.is_empty());
        assert_eq!(history.window(), 0);
    }

    #[test]
    fn test_clear() {
        let mut history = ExclusionHistory::new(3);
        history.push(set(&[CardType::Orc, CardType::Goblin]));
        history.clear();
        assert!(history.excluded().is_empty());
    }
}
