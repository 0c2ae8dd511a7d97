//! The game session.
//!
//! `GameSession` is the single entry point for callers. It owns the board,
//! the catalog, the random streams and the turn controller, answers read
//! queries, and delivers buffered events to observers when each command
//! returns.

use im::Vector;
use tracing::{debug, info, warn};

use crate::board::{Board, Position, Tile, TileMode, TileNumberGenerator};
use crate::cards::{CardCatalog, CardType};
use crate::core::{ConfigError, EngineConfig, GameRng, PlayError};
use crate::events::{EventBus, GameEvent, GameObserver, ObserverId};
use crate::inventory::{CardInventory, OwnedCard};
use crate::scoring::{self, BoardPreview, ScoreBreakdown};
use crate::stage::{GamePhase, StageDefinition, TurnContext, TurnController, TurnData, TurnOutcome};

/// One player's run through the configured stages.
///
/// ## Usage
///
/// ```
/// use tile_draft::cards::CardType;
/// use tile_draft::core::EngineConfig;
/// use tile_draft::session::GameSession;
/// use tile_draft::stage::{DrawPolicy, StageDefinition};
///
/// let config = EngineConfig::default()
///     .with_starting_deck(vec![CardType::Robot])
///     .with_stages(vec![StageDefinition::new(1, 1, 10).with_draw(DrawPolicy::new(1, 1, 1))]);
/// let mut session = GameSession::new(config).unwrap();
///
/// session.start_stage(1).unwrap();
/// let total = session.place(0, 0, CardType::Robot).unwrap();
/// assert_eq!(total, 14);
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: EngineConfig,
    catalog: CardCatalog,
    numbers: TileNumberGenerator,
    board: Board,
    controller: TurnController,
    draw_rng: GameRng,
    tile_rng: GameRng,
    bus: EventBus,
    current_stage_id: Option<u32>,
}

impl GameSession {
    /// Validate `config` and build an idle session.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let catalog = config.card_catalog();
        let numbers = TileNumberGenerator::new(config.tile_numbers.clone());
        let root = GameRng::new(config.seed);
        let draw_rng = root.for_context("draw");
        let mut tile_rng = root.for_context("tiles");

        let mut board = Board::new(TileMode::Cleared);
        if config.numbered_mode {
            board.set_mode(TileMode::Numbered, &numbers, &mut tile_rng);
        }

        let inventory = CardInventory::new(
            config.unique_type_cap,
            config.history_window,
            config.duplicate_policy,
        );

        let bus = EventBus::with_log_capacity(config.event_log_capacity);

        info!(seed = config.seed, stages = config.stages.len(), "session created");
        Ok(Self {
            config,
            catalog,
            numbers,
            board,
            controller: TurnController::new(inventory),
            draw_rng,
            tile_rng,
            bus,
            current_stage_id: None,
        })
    }

    fn split(&mut self) -> (&mut TurnController, TurnContext<'_>) {
        (
            &mut self.controller,
            TurnContext {
                board: &mut self.board,
                catalog: &self.catalog,
                draw_rng: &mut self.draw_rng,
                tile_rng: &mut self.tile_rng,
                numbers: &self.numbers,
                events: self.bus.pending_mut(),
            },
        )
    }

    fn finish<T>(&mut self, result: Result<T, PlayError>) -> Result<T, PlayError> {
        if let Err(err) = &result {
            debug!(%err, "command rejected");
        }
        self.bus.flush();
        result
    }

    // === Commands ===

    /// Start (or restart) a stage by id.
    ///
    /// The first configured stage, and whichever stage the session starts
    /// with, reset the deck to the starting deck. A later stage entered after
    /// another keeps the deck as it is.
    pub fn start_stage(&mut self, stage_id: u32) -> Result<TurnData, PlayError> {
        let Some(stage) = self.config.stage(stage_id).cloned() else {
            warn!(stage_id, "start_stage: unknown stage");
            return Err(PlayError::UnknownStage(stage_id));
        };
        let is_first = self.config.stages.first().map(|s| s.stage_id) == Some(stage_id);
        let seed_deck = is_first || self.current_stage_id.is_none();
        let deck = seed_deck.then(|| self.config.starting_deck.clone());

        let result = {
            let (controller, mut ctx) = self.split();
            controller.start_stage(stage, deck.as_deref(), &mut ctx)
        };
        if result.is_ok() {
            self.current_stage_id = Some(stage_id);
        }
        self.finish(result)
    }

    /// Start the stage after the current one.
    ///
    /// Only allowed once the current stage is won (`Victory` or `Shop`). Use
    /// `start_stage` to replay a stage after a loss.
    pub fn start_next_stage(&mut self) -> Result<TurnData, PlayError> {
        let phase = self.controller.phase();
        if self.current_stage_id.is_some()
            && !matches!(phase, GamePhase::Victory | GamePhase::Shop)
        {
            warn!(?phase, "start_next_stage: current stage not won");
            return Err(PlayError::WrongPhase(phase));
        }
        let next = self
            .current_stage_id
            .and_then(|id| self.config.next_stage_id(id))
            .ok_or(PlayError::NoNextStage)?;
        self.start_stage(next)
    }

    /// Place a card from the hand. Returns the new board total.
    pub fn place(&mut self, x: usize, y: usize, card_type: CardType) -> Result<i32, PlayError> {
        let result = match Position::new(x, y) {
            Some(pos) => {
                let (controller, mut ctx) = self.split();
                controller.place_block(pos, card_type, &mut ctx)
            }
            None => Err(PlayError::InvalidPosition { x, y }),
        };
        self.finish(result)
    }

    /// Take back a card placed this turn. Returns the new board total.
    pub fn remove(&mut self, x: usize, y: usize) -> Result<i32, PlayError> {
        let result = match Position::new(x, y) {
            Some(pos) => {
                let (controller, mut ctx) = self.split();
                controller.remove_block(pos, &mut ctx)
            }
            None => Err(PlayError::InvalidPosition { x, y }),
        };
        self.finish(result)
    }

    pub fn end_turn(&mut self) -> Result<TurnOutcome, PlayError> {
        let result = {
            let (controller, mut ctx) = self.split();
            controller.end_turn(&mut ctx)
        };
        self.finish(result)
    }

    /// Switch between cleared and numbered tiles.
    pub fn set_tile_mode(&mut self, numbered: bool) {
        let mode = if numbered {
            TileMode::Numbered
        } else {
            TileMode::Cleared
        };
        if self.board.mode() == mode {
            return;
        }
        info!(?mode, "tile mode changed");
        self.board.set_mode(mode, &self.numbers, &mut self.tile_rng);
        scoring::calculate_all(&mut self.board);
        let total = scoring::total_score(&self.board);
        self.bus.raise(GameEvent::BoardUpdated);
        self.bus.raise(GameEvent::ScoreUpdated(total));
        self.bus.flush();
    }

    /// Enter the shop after clearing a stage that has a successor.
    pub fn open_shop(&mut self) -> Result<(), PlayError> {
        let has_next = self
            .current_stage_id
            .and_then(|id| self.config.next_stage_id(id))
            .is_some();
        let result = if self.controller.phase() == GamePhase::Victory && !has_next {
            Err(PlayError::NoNextStage)
        } else {
            self.controller.open_shop(self.bus.pending_mut())
        };
        self.finish(result)
    }

    /// Swap an owned card type for an unowned one.
    pub fn shop_swap(&mut self, out_type: CardType, in_type: CardType) -> Result<(), PlayError> {
        let result = self
            .controller
            .shop_swap(out_type, in_type, &self.catalog, self.bus.pending_mut());
        self.finish(result)
    }

    /// Swap the deck entry at `index` for an unowned type.
    pub fn shop_swap_at_index(&mut self, index: usize, in_type: CardType) -> Result<(), PlayError> {
        let result = self
            .controller
            .shop_swap_at_index(index, in_type, &self.catalog, self.bus.pending_mut());
        self.finish(result)
    }

    // === Observers ===

    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) -> ObserverId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Every event delivered since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain_log()
    }

    // === Queries ===

    #[must_use]
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.board.tile_at(x, y)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.controller.current_turn()
    }

    #[must_use]
    pub fn turn_data(&self) -> &TurnData {
        self.controller.turn_data()
    }

    #[must_use]
    pub fn cumulative_score(&self) -> i32 {
        self.controller.cumulative_score()
    }

    /// Sum of tile scores currently on the board.
    #[must_use]
    pub fn total_score(&self) -> i32 {
        scoring::total_score(&self.board)
    }

    #[must_use]
    pub fn score_breakdown(&self, x: usize, y: usize) -> Option<ScoreBreakdown> {
        scoring::breakdown(&self.board, Position::new(x, y)?)
    }

    /// What placing `card_type` at `(x, y)` would do to every tile.
    ///
    /// Previews a placement on an empty tile or a replacement on a tile
    /// that could be taken back this turn. The board is not modified.
    #[must_use]
    pub fn board_preview(&self, x: usize, y: usize, card_type: CardType) -> Option<BoardPreview> {
        let pos = Position::new(x, y)?;
        let card = self.catalog.instantiate(card_type)?;
        let turn = self.current_turn();
        if self.board.tile(pos)?.is_empty() {
            scoring::preview_placement(&self.board, pos, card, turn)
        } else {
            scoring::preview_replacement(&self.board, pos, card, turn)
        }
    }

    #[must_use]
    pub fn owned(&self) -> &Vector<OwnedCard> {
        self.controller.inventory().owned()
    }

    /// Every owned copy, expanded.
    #[must_use]
    pub fn owned_cards(&self) -> Vec<CardType> {
        self.controller.inventory().owned_cards()
    }

    #[must_use]
    pub fn active_cards(&self) -> &[CardType] {
        self.controller.inventory().active()
    }

    #[must_use]
    pub fn can_select(&self, card_type: CardType) -> bool {
        self.controller.inventory().can_select(card_type)
    }

    #[must_use]
    pub fn current_stage(&self) -> Option<&StageDefinition> {
        self.controller.stage()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.controller.phase()
    }

    #[must_use]
    pub fn inventory(&self) -> &CardInventory {
        self.controller.inventory()
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
