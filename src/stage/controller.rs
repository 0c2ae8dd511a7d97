//! Turn and stage state machine.
//!
//! ```text
//! Idle --start_stage--> Playing{1} --end_turn--> Playing{2} ... Playing{end}
//!                                                              |
//!                                         target met?  yes --> Victory --open_shop--> Shop
//!                                                      no  --> GameOver
//! ```
//!
//! The controller owns the card inventory and the per-turn bookkeeping. The
//! board, catalog, random streams and event buffer belong to the session and
//! are lent to each call through a [`TurnContext`].

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, error, info, warn};

use super::definition::StageDefinition;
use super::turn::{GamePhase, TurnData, TurnOutcome};
use crate::board::{Board, Position, TileMode, TileNumberGenerator};
use crate::cards::{CardCatalog, CardType};
use crate::core::{GameRng, PlayError};
use crate::events::GameEvent;
use crate::inventory::CardInventory;
use crate::scoring::{calculate_all, total_score};

/// Session state lent to the controller for one command.
pub struct TurnContext<'a> {
    pub board: &'a mut Board,
    pub catalog: &'a CardCatalog,
    /// Stream used for drawing hands.
    pub draw_rng: &'a mut GameRng,
    /// Stream used for tile numbers.
    pub tile_rng: &'a mut GameRng,
    pub numbers: &'a TileNumberGenerator,
    /// Events raised by the command, in order.
    pub events: &'a mut Vec<GameEvent>,
}

impl TurnContext<'_> {
    /// Rescore the board and announce the change.
    fn rescore(&mut self) -> i32 {
        calculate_all(self.board);
        let total = total_score(self.board);
        self.events.push(GameEvent::BoardUpdated);
        self.events.push(GameEvent::ScoreUpdated(total));
        total
    }
}

#[derive(Clone, Debug)]
pub struct TurnController {
    inventory: CardInventory,
    stage: Option<StageDefinition>,
    phase: GamePhase,
    turn_data: TurnData,
    cumulative_score: i32,
    turn_scores: Vec<i32>,
    /// Types placed this turn and still on the board, with copy counts.
    used_this_turn: FxHashMap<CardType, usize>,
}

impl TurnController {
    #[must_use]
    pub fn new(inventory: CardInventory) -> Self {
        Self {
            inventory,
            stage: None,
            phase: GamePhase::Idle,
            turn_data: TurnData::default(),
            cumulative_score: 0,
            turn_scores: Vec::new(),
            used_this_turn: FxHashMap::default(),
        }
    }

    // === Stage ===

    /// Start `stage` from a clean board and immediately begin turn 1.
    ///
    /// `starting_deck` replaces the owned deck when given; otherwise the deck
    /// carries over from the previous stage. Accepted from any phase. An
    /// invalid stage is rejected before anything changes.
    pub fn start_stage(
        &mut self,
        stage: StageDefinition,
        starting_deck: Option<&[CardType]>,
        ctx: &mut TurnContext<'_>,
    ) -> Result<TurnData, PlayError> {
        if let Err(err) = stage.validate() {
            error!(stage = stage.stage_id, %err, "start_stage: invalid stage");
            return Err(PlayError::InvalidStage {
                stage_id: stage.stage_id,
                reason: err.to_string(),
            });
        }
        info!(stage = stage.stage_id, target = stage.target_score, end_turn = stage.end_turn, "starting stage");

        if let Some(deck) = starting_deck {
            self.inventory.reset_deck(deck, ctx.catalog);
            ctx.events.push(GameEvent::DeckChanged);
        }
        self.inventory.begin_stage(&stage);

        self.cumulative_score = 0;
        self.turn_scores.clear();
        self.used_this_turn.clear();

        ctx.board.clear_all();
        if ctx.board.mode() == TileMode::Numbered {
            ctx.board.refresh_numbers(ctx.numbers, ctx.tile_rng);
        }
        ctx.rescore();

        self.stage = Some(stage);
        self.phase = GamePhase::Playing { turn: 0 };
        self.start_next_turn(ctx)
    }

    /// Advance to the next turn: apply unlocks and draw a hand.
    ///
    /// Running past the stage's last turn is a caller error; victory and
    /// defeat are decided by `end_turn`.
    pub fn start_next_turn(&mut self, ctx: &mut TurnContext<'_>) -> Result<TurnData, PlayError> {
        let current = self.playing_turn()?;
        let stage = self.stage.as_ref().ok_or(PlayError::WrongPhase(self.phase))?;
        let turn = current + 1;
        if turn > stage.end_turn {
            error!(turn, end_turn = stage.end_turn, "start_next_turn past the end of the stage");
            return Err(PlayError::TurnOutOfRange {
                turn,
                end_turn: stage.end_turn,
            });
        }

        let mut unlocked = false;
        for card_type in stage.unlocks_for_turn(turn) {
            if self.inventory.add_to_deck(card_type, ctx.catalog) {
                info!(%card_type, turn, "unlocked");
                unlocked = true;
            }
        }
        if unlocked {
            ctx.events.push(GameEvent::DeckChanged);
        }

        if !stage.carry_over_hand {
            self.inventory.clear_active();
        }
        let hand = self.inventory.activate_for_turn(turn, stage, ctx.catalog, ctx.draw_rng);
        debug!(turn, hand = hand.len(), "hand drawn");

        self.used_this_turn.clear();
        self.phase = GamePhase::Playing { turn };
        self.turn_data = TurnData {
            turn_number: turn,
            target_score: stage.target_score,
            available_cards: hand,
            current_turn_score: total_score(ctx.board),
        };

        ctx.events.push(GameEvent::GameStateChanged(self.phase));
        ctx.events.push(GameEvent::TurnStarted(self.turn_data.clone()));
        Ok(self.turn_data.clone())
    }

    // === Moves ===

    /// Play one card of `card_type` from the hand onto `pos`.
    ///
    /// Nothing changes on failure: a card taken from the hand is put back if
    /// the tile turns out to be occupied.
    pub fn place_block(
        &mut self,
        pos: Position,
        card_type: CardType,
        ctx: &mut TurnContext<'_>,
    ) -> Result<i32, PlayError> {
        let turn = self.playing_turn()?;
        let card = ctx
            .catalog
            .instantiate(card_type)
            .ok_or(PlayError::UnknownCard(card_type))?;

        if !self.inventory.try_use(card_type) {
            return Err(if self.inventory.active_count(card_type) == 0 {
                PlayError::CardUnavailable(card_type)
            } else {
                PlayError::CardNotSelectable(card_type)
            });
        }
        if !ctx.board.place(pos, card, turn) {
            self.inventory.return_card(card_type);
            return Err(PlayError::TileOccupied(pos));
        }

        *self.used_this_turn.entry(card_type).or_insert(0) += 1;
        debug!(%pos, %card_type, turn, "placed");
        Ok(self.after_move(ctx))
    }

    /// Take back a card placed this turn and return it to the hand.
    pub fn remove_block(&mut self, pos: Position, ctx: &mut TurnContext<'_>) -> Result<i32, PlayError> {
        let turn = self.playing_turn()?;
        let tile = ctx.board.tile(pos).ok_or(PlayError::TileEmpty(pos))?;
        if tile.is_empty() {
            return Err(PlayError::TileEmpty(pos));
        }
        let card = ctx.board.remove(pos, turn).ok_or(PlayError::NotRemovable(pos))?;

        self.inventory.return_card(card.card_type);
        if let Some(count) = self.used_this_turn.get_mut(&card.card_type) {
            *count -= 1;
            if *count == 0 {
                self.used_this_turn.remove(&card.card_type);
            }
        }
        debug!(%pos, card_type = %card.card_type, turn, "removed");
        Ok(self.after_move(ctx))
    }

    fn after_move(&mut self, ctx: &mut TurnContext<'_>) -> i32 {
        let total = ctx.rescore();
        self.turn_data.current_turn_score = total;
        self.turn_data.available_cards = self.inventory.hand(ctx.catalog);
        total
    }

    // === End of turn ===

    /// Score the board as it stands and end the turn.
    pub fn end_turn(&mut self, ctx: &mut TurnContext<'_>) -> Result<TurnOutcome, PlayError> {
        self.playing_turn()?;
        let board_score = total_score(ctx.board);
        let used = self.used_types();
        self.end_turn_with(board_score, &used, ctx)
    }

    /// End the turn with an explicit score and used-type set.
    ///
    /// Records the score, feeds `used` to the exclusion history and either
    /// processes the board and starts the next turn or settles the stage.
    pub fn end_turn_with(
        &mut self,
        board_score: i32,
        used: &FxHashSet<CardType>,
        ctx: &mut TurnContext<'_>,
    ) -> Result<TurnOutcome, PlayError> {
        let turn = self.playing_turn()?;
        let (end_turn, target_score) = match &self.stage {
            Some(stage) => (stage.end_turn, stage.target_score),
            None => return Err(PlayError::WrongPhase(self.phase)),
        };

        self.turn_scores.push(board_score);
        self.inventory.on_turn_end(used);
        self.cumulative_score += board_score;
        info!(turn, board_score, cumulative = self.cumulative_score, "turn ended");

        if turn < end_turn {
            match ctx.board.mode() {
                TileMode::Cleared => ctx.board.clear_occupants(),
                TileMode::Numbered => {
                    let destroyed = ctx.board.decay_all(ctx.numbers, ctx.tile_rng);
                    if !destroyed.is_empty() {
                        debug!(count = destroyed.len(), "cards expired");
                    }
                }
            }
            ctx.rescore();
            let data = self.start_next_turn(ctx)?;
            return Ok(TurnOutcome::NextTurn(data));
        }

        let cumulative_score = self.cumulative_score;
        let outcome = if cumulative_score >= target_score {
            self.phase = GamePhase::Victory;
            TurnOutcome::Victory {
                cumulative_score,
                target_score,
            }
        } else {
            self.phase = GamePhase::GameOver;
            TurnOutcome::GameOver {
                cumulative_score,
                target_score,
            }
        };
        info!(phase = ?self.phase, cumulative_score, target_score, "stage settled");
        ctx.events.push(GameEvent::GameStateChanged(self.phase));
        Ok(outcome)
    }

    // === Shop ===

    /// Move from `Victory` to `Shop`.
    pub fn open_shop(&mut self, events: &mut Vec<GameEvent>) -> Result<(), PlayError> {
        if self.phase != GamePhase::Victory {
            warn!(phase = ?self.phase, "open_shop outside Victory");
            return Err(PlayError::WrongPhase(self.phase));
        }
        self.phase = GamePhase::Shop;
        events.push(GameEvent::GameStateChanged(self.phase));
        Ok(())
    }

    /// Swap an owned type for an unowned one. Only accepted in `Shop`.
    pub fn shop_swap(
        &mut self,
        out_type: CardType,
        in_type: CardType,
        catalog: &CardCatalog,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), PlayError> {
        self.require_shop()?;
        self.inventory.replace_type(out_type, in_type, catalog)?;
        events.push(GameEvent::DeckChanged);
        Ok(())
    }

    /// Swap the deck entry at `index` for an unowned type. Only accepted in `Shop`.
    pub fn shop_swap_at_index(
        &mut self,
        index: usize,
        in_type: CardType,
        catalog: &CardCatalog,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), PlayError> {
        self.require_shop()?;
        self.inventory.replace_type_at_index(index, in_type, catalog)?;
        events.push(GameEvent::DeckChanged);
        Ok(())
    }

    fn require_shop(&self) -> Result<(), PlayError> {
        if self.phase == GamePhase::Shop {
            Ok(())
        } else {
            warn!(phase = ?self.phase, "shop swap outside Shop");
            Err(PlayError::WrongPhase(self.phase))
        }
    }

    fn playing_turn(&self) -> Result<u32, PlayError> {
        match self.phase {
            GamePhase::Playing { turn } => Ok(turn),
            phase => {
                warn!(?phase, "turn command outside Playing");
                Err(PlayError::WrongPhase(phase))
            }
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current turn number; 0 before the first turn of a stage.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.turn_data.turn_number
    }

    #[must_use]
    pub fn turn_data(&self) -> &TurnData {
        &self.turn_data
    }

    #[must_use]
    pub fn stage(&self) -> Option<&StageDefinition> {
        self.stage.as_ref()
    }

    #[must_use]
    pub fn cumulative_score(&self) -> i32 {
        self.cumulative_score
    }

    /// Board score recorded at the end of each finished turn.
    #[must_use]
    pub fn turn_scores(&self) -> &[i32] {
        &self.turn_scores
    }

    /// Types placed this turn and still on the board.
    #[must_use]
    pub fn used_types(&self) -> FxHashSet<CardType> {
        self.used_this_turn.keys().copied().collect()
    }

    #[must_use]
    pub fn inventory(&self) -> &CardInventory {
        &self.inventory
    }
}
