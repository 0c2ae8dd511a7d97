//! Engine configuration.
//!
//! Callers configure a session at startup by providing:
//! - the card catalog (base scores and copy counts)
//! - the stage list (turn limits, targets, draw counts, unlocks)
//! - deck rules (unique-type cap, exclusion window, duplicate policy)
//! - numbered-mode tile distribution
//!
//! Everything here is read-only to the engine once a session exists.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::{CardCatalog, CardDefinition, CardType};
use crate::events::DEFAULT_LOG_CAPACITY;
use crate::stage::{DrawPolicy, StageDefinition, Unlock};

/// What `add_to_deck` does with a type that is already owned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Re-adding an owned type is a logged no-op.
    #[default]
    Skip,
    /// Re-adding an owned type appends another block of copies.
    Append,
}

/// One entry of the numbered-mode tile distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWeight {
    /// Tile number this entry produces.
    pub value: i32,

    /// Relative weight. Zero removes the value from the weighted pool.
    pub weight: u32,

    /// Maximum tiles that may carry this number at once before the value
    /// drops out of the weighted pool.
    pub cap: usize,
}

impl TileWeight {
    #[must_use]
    pub const fn new(value: i32, weight: u32, cap: usize) -> Self {
        Self { value, weight, cap }
    }
}

/// Numbered-mode tile number distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileNumberConfig {
    /// Smallest number of the uniform fallback range.
    pub min: i32,

    /// Largest number of the uniform fallback range.
    pub max: i32,

    /// Weighted values with per-value caps.
    pub weights: Vec<TileWeight>,
}

impl Default for TileNumberConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 3,
            weights: vec![
                TileWeight::new(1, 3, 4),
                TileWeight::new(2, 2, 3),
                TileWeight::new(3, 1, 2),
            ],
        }
    }
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use tile_draft::core::EngineConfig;
///
/// let config = EngineConfig::default().with_seed(7).with_numbered_mode(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, 7);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root RNG seed.
    pub seed: u64,

    /// Maximum unique types the deck may hold.
    pub unique_type_cap: usize,

    /// Turns a used type stays excluded from selection.
    pub history_window: usize,

    /// `add_to_deck` behavior for owned types.
    pub duplicate_policy: DuplicatePolicy,

    /// Start sessions in numbered (decaying tile) mode.
    pub numbered_mode: bool,

    /// Numbered-mode distribution.
    pub tile_numbers: TileNumberConfig,

    /// Catalog entries.
    pub catalog: Vec<CardDefinition>,

    /// Deck the first stage starts from.
    pub starting_deck: Vec<CardType>,

    /// Stages in play order.
    pub stages: Vec<StageDefinition>,

    /// Delivered events kept for `drain_events`. Zero keeps none.
    pub event_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            unique_type_cap: 7,
            history_window: 2,
            duplicate_policy: DuplicatePolicy::default(),
            numbered_mode: false,
            tile_numbers: TileNumberConfig::default(),
            catalog: CardCatalog::standard().iter().cloned().collect(),
            starting_deck: vec![
                CardType::Orc,
                CardType::Werewolf,
                CardType::Goblin,
                CardType::Elf,
            ],
            stages: default_stages(),
            event_log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

fn default_stages() -> Vec<StageDefinition> {
    vec![
        StageDefinition::new(1, 5, 60)
            .with_draw(DrawPolicy::new(2, 3, 3))
            .with_unlock(Unlock::new(3, CardType::Dwarf)),
        StageDefinition::new(2, 6, 90)
            .with_draw(DrawPolicy::new(3, 3, 4))
            .with_exclusion(true)
            .with_unlock(Unlock::new(2, CardType::Angel))
            .with_unlock(Unlock::new(4, CardType::Vampire)),
        StageDefinition::new(3, 7, 130)
            .with_draw(DrawPolicy::new(3, 4, 4))
            .with_exclusion(true)
            .with_unlock(Unlock::new(3, CardType::Robot)),
    ]
}

impl EngineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start in numbered mode.
    #[must_use]
    pub fn with_numbered_mode(mut self, numbered: bool) -> Self {
        self.numbered_mode = numbered;
        self
    }

    /// Replace the stage list.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<StageDefinition>) -> Self {
        self.stages = stages;
        self
    }

    /// Replace the starting deck.
    #[must_use]
    pub fn with_starting_deck(mut self, deck: Vec<CardType>) -> Self {
        self.starting_deck = deck;
        self
    }

    /// Set the duplicate-ownership policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the exclusion window length.
    #[must_use]
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Set the unique-type cap.
    #[must_use]
    pub fn with_unique_type_cap(mut self, cap: usize) -> Self {
        self.unique_type_cap = cap;
        self
    }

    /// Set how many delivered events the session keeps for draining.
    #[must_use]
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    /// Build the lookup catalog from the entry list.
    #[must_use]
    pub fn card_catalog(&self) -> CardCatalog {
        self.catalog.iter().cloned().collect()
    }

    /// Get a stage by id.
    #[must_use]
    pub fn stage(&self, stage_id: u32) -> Option<&StageDefinition> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }

    /// Id of the stage after `stage_id` in play order.
    #[must_use]
    pub fn next_stage_id(&self, stage_id: u32) -> Option<u32> {
        let idx = self.stages.iter().position(|s| s.stage_id == stage_id)?;
        self.stages.get(idx + 1).map(|s| s.stage_id)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }

        let catalog = self.card_catalog();
        if let Some(def) = catalog.iter().find(|d| d.copies == 0) {
            return Err(ConfigError::ZeroCopies(def.card_type));
        }

        let mut seen = FxHashSet::default();
        for stage in &self.stages {
            if !seen.insert(stage.stage_id) {
                return Err(ConfigError::DuplicateStage(stage.stage_id));
            }
            stage.validate()?;
            for unlock in &stage.unlocks {
                if !catalog.contains(unlock.card_type) {
                    return Err(ConfigError::MissingCatalogEntry(unlock.card_type));
                }
            }
        }

        for &card_type in &self.starting_deck {
            if !catalog.contains(card_type) {
                return Err(ConfigError::MissingCatalogEntry(card_type));
            }
        }

        let unique = self.starting_deck.iter().collect::<FxHashSet<_>>().len();
        if unique > self.unique_type_cap {
            return Err(ConfigError::StartingDeckTooLarge {
                unique,
                cap: self.unique_type_cap,
            });
        }

        if self.tile_numbers.min > self.tile_numbers.max {
            return Err(ConfigError::InvalidTileNumbers {
                min: self.tile_numbers.min,
                max: self.tile_numbers.max,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unique_type_cap, 7);
        assert_eq!(config.history_window, 2);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Skip);
        assert_eq!(config.card_catalog().len(), CardType::COUNT);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_seed(123)
            .with_history_window(3)
            .with_duplicate_policy(DuplicatePolicy::Append)
            .with_unique_type_cap(5)
            .with_event_log_capacity(16);

        assert_eq!(config.seed, 123);
        assert_eq!(config.event_log_capacity, 16);
        assert_eq!(config.history_window, 3);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Append);
        assert_eq!(config.unique_type_cap, 5);
    }

    #[test]
    fn test_stage_lookup() {
        let config = EngineConfig::default();
        assert_eq!(config.stage(2).map(|s| s.end_turn), Some(6));
        assert!(config.stage(99).is_none());
        assert_eq!(config.next_stage_id(1), Some(2));
        assert_eq!(config.next_stage_id(3), None);
    }

    #[test]
    fn test_validate_rejects_empty_stage_list() {
        let config = EngineConfig::default().with_stages(Vec::new());
        assert!(matches!(config.validate(), Err(ConfigError::NoStages)));
    }

    #[test]
    fn test_validate_rejects_zero_end_turn() {
        let config = EngineConfig::default().with_stages(vec![StageDefinition::new(1, 0, 10)]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStage { stage_id: 1, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_stage_ids() {
        let config = EngineConfig::default().with_stages(vec![
            StageDefinition::new(1, 3, 10),
            StageDefinition::new(1, 4, 20),
        ]);
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateStage(1))));
    }

    #[test]
    fn test_validate_rejects_missing_catalog_entry() {
        let mut config = EngineConfig::default();
        config.catalog.retain(|d| d.card_type != CardType::Goblin);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCatalogEntry(CardType::Goblin))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_starting_deck() {
        let config = EngineConfig::default().with_starting_deck(CardType::ALL[..8].to_vec());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartingDeckTooLarge { unique: 8, cap: 7 })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_tile_range() {
        let mut config = EngineConfig::default();
        config.tile_numbers.min = 4;
        config.tile_numbers.max = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTileNumbers { min: 4, max: 2 })
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"{
            "seed": 9,
            "starting_deck": ["Orc", "Robot"],
            "stages": [
                { "stage_id": 1, "end_turn": 3, "target_score": 20 }
            ]
        }"#;

        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.unique_type_cap, 7);
        assert_eq!(config.starting_deck, vec![CardType::Orc, CardType::Robot]);
        assert_eq!(config.stages[0].draw, DrawPolicy::default());
        assert_eq!(config.tile_numbers, TileNumberConfig::default());
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = EngineConfig::default().with_seed(77);
        let json = serde_json::to_string(&config).unwrap();
        let restored = EngineConfig::from_json(&json).unwrap();
        assert_eq!(restored.seed, 77);
        assert_eq!(restored.stages, config.stages);
    }
}
