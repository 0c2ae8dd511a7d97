//! Scoring engine.
//!
//! Pure functions of a `Board`: compute aggregates once, then score every
//! occupied tile with the rule for its card type.
//!
//! | Type | Rule |
//! |---|---|
//! | Orc | −1 if any orthogonal neighbor is an Orc |
//! | Werewolf | +1 if 2+ orthogonal neighbors are another type |
//! | Goblin | +2 per orthogonal Goblin |
//! | Elf | −1 per other Elf on the board, −1 per empty tile |
//! | Dwarf | +1 with exactly one orthogonal Dwarf, −1 with two or more |
//! | Angel | +1 per other type on the board, −1 per other Angel |
//! | Dragon | +1 per ring tile, −1 per other Dragon, −1 per occupied orthogonal tile |
//! | Devil | +1 if no other Devil shares its row |
//! | Vampire | +1 per other-type card in its column |
//! | Naga | +2 per distinct type in its ring |
//! | Robot | +7 while the center is empty |
//! | Slime | +5 per Slime, −10 if 2+ Slime were placed on its turn |

mod breakdown;
mod preview;
mod rules;
mod stats;

pub use breakdown::{breakdown, calculate_all, total_score, ScoreBreakdown, ScoreModifier};
pub use preview::{preview_placement, preview_replacement, BoardPreview};
pub use stats::GlobalScoreData;
