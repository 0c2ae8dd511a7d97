//! Stage definitions.
//!
//! A stage is a bounded run of turns with a cumulative score target, a
//! draw-count policy and an unlock schedule. Stages are supplied by the
//! caller and never modified by the engine.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::ConfigError;

/// How many card types are drawn at the start of each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPolicy {
    pub first_turn: usize,
    pub second_turn: usize,
    pub final_turn: usize,
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self::new(3, 3, 3)
    }
}

impl DrawPolicy {
    #[must_use]
    pub const fn new(first_turn: usize, second_turn: usize, final_turn: usize) -> Self {
        Self {
            first_turn,
            second_turn,
            final_turn,
        }
    }

    /// Draw count for `turn` of a stage ending at `end_turn`.
    ///
    /// Turn 1 and turn 2 take precedence over the final turn; every other
    /// turn draws the largest of the three counts.
    #[must_use]
    pub fn draw_count(&self, turn: u32, end_turn: u32) -> usize {
        match turn {
            1 => self.first_turn,
            2 => self.second_turn,
            t if t == end_turn => self.final_turn,
            _ => self.first_turn.max(self.second_turn).max(self.final_turn),
        }
    }
}

/// A card type joining the deck at the start of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    pub turn: u32,
    pub card_type: CardType,
}

impl Unlock {
    #[must_use]
    pub const fn new(turn: u32, card_type: CardType) -> Self {
        Self { turn, card_type }
    }
}

/// Immutable stage configuration.
///
/// ## Example
///
/// ```
/// use tile_draft::cards::CardType;
/// use tile_draft::stage::{DrawPolicy, StageDefinition, Unlock};
///
/// let stage = StageDefinition::new(1, 5, 40)
///     .with_draw(DrawPolicy::new(2, 3, 4))
///     .with_exclusion(true)
///     .with_unlock(Unlock::new(3, CardType::Naga));
///
/// assert_eq!(stage.draw.draw_count(5, stage.end_turn), 4);
/// assert_eq!(stage.unlocks_for_turn(3).collect::<Vec<_>>(), vec![CardType::Naga]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub stage_id: u32,

    /// Last turn of the stage (inclusive).
    pub end_turn: u32,

    /// Cumulative score needed by the end of `end_turn`.
    pub target_score: i32,

    #[serde(default)]
    pub draw: DrawPolicy,

    /// Block types used in recent turns from being selected.
    #[serde(default)]
    pub exclude_previous_turn_types: bool,

    /// Keep unused hand cards from one turn to the next.
    #[serde(default)]
    pub carry_over_hand: bool,

    #[serde(default)]
    pub unlocks: Vec<Unlock>,
}

impl StageDefinition {
    #[must_use]
    pub fn new(stage_id: u32, end_turn: u32, target_score: i32) -> Self {
        Self {
            stage_id,
            end_turn,
            target_score,
            draw: DrawPolicy::default(),
            exclude_previous_turn_types: false,
            carry_over_hand: false,
            unlocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_draw(mut self, draw: DrawPolicy) -> Self {
        self.draw = draw;
        self
    }

    #[must_use]
    pub fn with_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_previous_turn_types = exclude;
        self
    }

    #[must_use]
    pub fn with_carry_over(mut self, carry_over: bool) -> Self {
        self.carry_over_hand = carry_over;
        self
    }

    #[must_use]
    pub fn with_unlock(mut self, unlock: Unlock) -> Self {
        self.unlocks.push(unlock);
        self
    }

    /// Types unlocked at the start of `turn`.
    pub fn unlocks_for_turn(&self, turn: u32) -> impl Iterator<Item = CardType> + '_ {
        self.unlocks
            .iter()
            .filter(move |u| u.turn == turn)
            .map(|u| u.card_type)
    }

    /// Draw count for `turn` of this stage.
    #[must_use]
    pub fn draw_count(&self, turn: u32) -> usize {
        self.draw.draw_count(turn, self.end_turn)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidStage {
            stage_id: self.stage_id,
            reason,
        };

        if self.end_turn == 0 {
            return Err(invalid("end_turn must be positive".to_string()));
        }
        if let Some(u) = self.unlocks.iter().find(|u| u.turn == 0 || u.turn > self.end_turn) {
            return Err(invalid(format!(
                "unlock of {} on turn {} is outside 1..={}",
                u.card_type, u.turn, self.end_turn
            )));
        }
        if self.draw == DrawPolicy::new(0, 0, 0) {
            return Err(invalid("draw policy never draws a card".to_string()));
        }
        Ok(())
    }
}
