//! The 3x3 board.
//!
//! `Board` owns exactly one `Tile` per coordinate. Coordinates are validated
//! at a single access point (`Board::tile`); everything else works on
//! `Position`s obtained from it or from the neighbor queries.
//!
//! The board knows nothing about scoring rules. It stores each tile's last
//! calculated score so callers can read it, but only `scoring` writes it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::numbering::TileNumberGenerator;
use crate::cards::CardInstance;
use crate::core::GameRng;

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// Number of tiles on the board.
pub const TILE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Board coordinate. `x` is the column, `y` is the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Build a position if it lies on the board.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// The center tile.
    #[must_use]
    pub const fn center() -> Self {
        Self {
            x: BOARD_SIZE / 2,
            y: BOARD_SIZE / 2,
        }
    }

    /// Row-major index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.y * BOARD_SIZE + self.x
    }

    const fn from_index(idx: usize) -> Self {
        Self {
            x: idx % BOARD_SIZE,
            y: idx / BOARD_SIZE,
        }
    }

    /// Every board position in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..TILE_COUNT).map(Self::from_index)
    }

    fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How the board is processed between turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileMode {
    /// Every card is cleared at the end of each turn.
    #[default]
    Cleared,
    /// Cards survive until their tile's decay counter runs out.
    Numbered,
}

/// One cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub occupant: Option<CardInstance>,
    /// Decay counter. Only meaningful in numbered mode.
    pub tile_number: i32,
    /// Zero whenever the tile is empty.
    pub calculated_score: i32,
    /// Turn the occupant was placed on.
    pub placed_turn: u32,
}

impl Tile {
    const fn empty(position: Position) -> Self {
        Self {
            position,
            occupant: None,
            tile_number: 0,
            calculated_score: 0,
            placed_turn: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Cards can only be taken back on the turn they were placed.
    #[must_use]
    pub fn is_removable(&self, current_turn: u32) -> bool {
        self.occupant.is_some() && self.placed_turn == current_turn
    }

    fn vacate(&mut self) -> Option<CardInstance> {
        self.calculated_score = 0;
        self.placed_turn = 0;
        self.occupant.take()
    }
}

/// Fixed-size grid of tiles.
///
/// ## Example
///
/// ```
/// use tile_draft::board::{Board, Position, TileMode};
/// use tile_draft::cards::{CardInstance, CardType};
///
/// let mut board = Board::new(TileMode::Cleared);
/// let center = Position::center();
///
/// assert!(board.place(center, CardInstance::new(CardType::Orc, 3), 1));
/// assert!(!board.place(center, CardInstance::new(CardType::Elf, 4), 1));
///
/// let removed = board.remove(center, 1).unwrap();
/// assert_eq!(removed.card_type, CardType::Orc);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: [Tile; TILE_COUNT],
    mode: TileMode,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(TileMode::default())
    }
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(mode: TileMode) -> Self {
        let mut tiles = [Tile::empty(Position::center()); TILE_COUNT];
        for pos in Position::all() {
            tiles[pos.index()] = Tile::empty(pos);
        }
        Self { tiles, mode }
    }

    #[must_use]
    pub fn mode(&self) -> TileMode {
        self.mode
    }

    /// Switch tile mode.
    ///
    /// Entering numbered mode gives every tile without a positive counter a
    /// fresh number; leaving it zeroes every counter.
    pub fn set_mode(&mut self, mode: TileMode, numbers: &TileNumberGenerator, rng: &mut GameRng) {
        self.mode = mode;
        match mode {
            TileMode::Numbered => self.refresh_numbers(numbers, rng),
            TileMode::Cleared => {
                for tile in &mut self.tiles {
                    tile.tile_number = 0;
                }
            }
        }
    }

    #[must_use]
    pub fn is_valid_position(x: usize, y: usize) -> bool {
        Position::new(x, y).is_some()
    }

    /// Tile at a position.
    #[must_use]
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(pos.index())
    }

    /// Tile at raw coordinates, `None` when off the board.
    #[must_use]
    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tile(Position::new(x, y)?)
    }

    fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.tiles.get_mut(pos.index())
    }

    /// Occupant of a tile.
    #[must_use]
    pub fn occupant(&self, pos: Position) -> Option<CardInstance> {
        self.tile(pos).and_then(|t| t.occupant)
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn empty_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_empty())
    }

    pub fn occupied_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied_tiles().count()
    }

    /// Put a card on an empty tile.
    ///
    /// Fails without mutation if the tile is occupied.
    pub fn place(&mut self, pos: Position, card: CardInstance, current_turn: u32) -> bool {
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        if tile.occupant.is_some() {
            debug!(%pos, "place rejected: tile occupied");
            return false;
        }

        tile.occupant = Some(card);
        tile.placed_turn = current_turn;
        true
    }

    /// Take back a card placed this turn.
    ///
    /// Returns the removed card, or `None` (no mutation) if the tile is empty
    /// or was placed on an earlier turn.
    pub fn remove(&mut self, pos: Position, current_turn: u32) -> Option<CardInstance> {
        let numbered = self.mode == TileMode::Numbered;
        let tile = self.tile_mut(pos)?;
        if !tile.is_removable(current_turn) {
            debug!(%pos, current_turn, placed_turn = tile.placed_turn, "remove rejected");
            return None;
        }

        let card = tile.vacate();
        if !numbered {
            tile.tile_number = 0;
        }
        card
    }

    /// End-of-turn decay for numbered mode.
    ///
    /// Cards on a tile whose counter is zero are destroyed (they do not go
    /// back to the inventory) and the tile gets a fresh number; other
    /// occupied tiles count down by one. Empty tiles without a positive
    /// counter get a fresh number.
    ///
    /// Returns the destroyed cards.
    pub fn decay_all(
        &mut self,
        numbers: &TileNumberGenerator,
        rng: &mut GameRng,
    ) -> SmallVec<[CardInstance; TILE_COUNT]> {
        let mut destroyed = SmallVec::new();

        for idx in 0..TILE_COUNT {
            let tile = &mut self.tiles[idx];
            let needs_number = if tile.occupant.is_some() {
                if tile.tile_number == 0 {
                    destroyed.extend(tile.vacate());
                    true
                } else {
                    tile.tile_number -= 1;
                    false
                }
            } else {
                tile.tile_number <= 0
            };

            if needs_number {
                let fresh = self.fresh_number(idx, numbers, rng);
                self.tiles[idx].tile_number = fresh;
            }
        }

        destroyed
    }

    /// Give every tile without a positive counter a fresh number.
    pub fn refresh_numbers(&mut self, numbers: &TileNumberGenerator, rng: &mut GameRng) {
        for idx in 0..TILE_COUNT {
            if self.tiles[idx].tile_number <= 0 {
                let fresh = self.fresh_number(idx, numbers, rng);
                self.tiles[idx].tile_number = fresh;
            }
        }
    }

    fn fresh_number(&self, except: usize, numbers: &TileNumberGenerator, rng: &mut GameRng) -> i32 {
        let existing: SmallVec<[i32; TILE_COUNT]> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|&(i, t)| i != except && t.tile_number > 0)
            .map(|(_, t)| t.tile_number)
            .collect();
        numbers.generate(&existing, rng)
    }

    /// Empty every tile and zero every counter.
    pub fn clear_all(&mut self) {
        for pos in Position::all() {
            self.tiles[pos.index()] = Tile::empty(pos);
        }
    }

    /// Empty every tile but keep the counters.
    pub fn clear_occupants(&mut self) {
        for tile in &mut self.tiles {
            tile.vacate();
        }
    }

    /// Orthogonal neighbors in [Up, Right, Down, Left] order.
    #[must_use]
    pub fn neighbors4(pos: Position) -> SmallVec<[Position; 4]> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(|(dx, dy)| pos.offset(dx, dy))
            .collect()
    }

    /// The 8-neighbor ring around a position. Edge tiles have fewer.
    #[must_use]
    pub fn neighbors_ring8(pos: Position) -> SmallVec<[Position; 8]> {
        let mut ring = SmallVec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                ring.extend(pos.offset(dx, dy));
            }
        }
        ring
    }

    /// Positions sharing a row (`y`).
    pub fn row(y: usize) -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).filter_map(move |x| Position::new(x, y))
    }

    /// Positions sharing a column (`x`).
    pub fn column(x: usize) -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).filter_map(move |y| Position::new(x, y))
    }

    /// Record a computed score. Empty tiles always read zero.
    pub(crate) fn set_score(&mut self, pos: Position, score: i32) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.calculated_score = if tile.is_empty() { 0 } else { score };
        }
    }

    /// Per-tile scores in row-major order.
    #[must_use]
    pub fn scores(&self) -> [i32; TILE_COUNT] {
        let mut out = [0; TILE_COUNT];
        for (slot, tile) in out.iter_mut().zip(self.tiles.iter()) {
            *slot = tile.calculated_score;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;
    use crate::core::{TileNumberConfig, TileWeight};

    fn orc() -> CardInstance {
        CardInstance::new(CardType::Orc, 3)
    }

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn test_one_tile_per_coordinate() {
        let board = Board::default();
        assert_eq!(board.tiles().count(), TILE_COUNT);
        for p in Position::all() {
            assert_eq!(board.tile(p).unwrap().position, p);
        }
    }

    #[test]
    fn test_position_validation() {
        assert!(Position::new(2, 2).is_some());
        assert!(Position::new(3, 0).is_none());
        assert!(Board::is_valid_position(0, 1));
        assert!(!Board::is_valid_position(1, 3));
        assert!(Board::default().tile_at(5, 5).is_none());
        assert_eq!(Position::center(), pos(1, 1));
        assert_eq!(format!("{}", pos(2, 0)), "(2, 0)");
    }

    #[test]
    fn test_place_sets_turn() {
        let mut board = Board::default();
        assert!(board.place(pos(0, 0), orc(), 4));

        let tile = board.tile(pos(0, 0)).unwrap();
        assert_eq!(tile.occupant, Some(orc()));
        assert_eq!(tile.placed_turn, 4);
        assert!(tile.is_removable(4));
        assert!(!tile.is_removable(5));
    }

    #[test]
    fn test_place_on_occupied_fails() {
        let mut board = Board::default();
        board.place(pos(1, 1), orc(), 1);
        let before = board.clone();

        assert!(!board.place(pos(1, 1), CardInstance::new(CardType::Elf, 4), 1));
        assert_eq!(board, before);
    }

    #[test]
    fn test_remove_only_current_turn() {
        let mut board = Board::default();
        board.place(pos(2, 1), orc(), 1);

        assert!(board.remove(pos(2, 1), 2).is_none());
        assert!(board.remove(pos(0, 0), 1).is_none());

        let card = board.remove(pos(2, 1), 1);
        assert_eq!(card, Some(orc()));
        let tile = board.tile(pos(2, 1)).unwrap();
        assert!(tile.is_empty());
        assert_eq!(tile.calculated_score, 0);
        assert_eq!(tile.placed_turn, 0);
    }

    #[test]
    fn test_remove_keeps_tile_number_only_in_numbered_mode() {
        let generator = TileNumberGenerator::default();
        let mut rng = GameRng::new(5);

        let mut board = Board::new(TileMode::Numbered);
        board.refresh_numbers(&generator, &mut rng);
        let number = board.tile(pos(0, 0)).unwrap().tile_number;
        board.place(pos(0, 0), orc(), 1);
        board.remove(pos(0, 0), 1);
        assert_eq!(board.tile(pos(0, 0)).unwrap().tile_number, number);

        let mut board = Board::new(TileMode::Cleared);
        board.refresh_numbers(&generator, &mut rng);
        board.place(pos(0, 0), orc(), 1);
        board.remove(pos(0, 0), 1);
        assert_eq!(board.tile(pos(0, 0)).unwrap().tile_number, 0);
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(Board::neighbors4(pos(1, 1)).len(), 4);
        assert_eq!(
            Board::neighbors4(pos(0, 0)).as_slice(),
            &[pos(1, 0), pos(0, 1)]
        );
        assert_eq!(Board::neighbors4(pos(1, 0)).len(), 3);

        assert_eq!(Board::neighbors_ring8(pos(1, 1)).len(), 8);
        assert_eq!(Board::neighbors_ring8(pos(0, 0)).len(), 3);
        assert_eq!(Board::neighbors_ring8(pos(1, 0)).len(), 5);
        assert!(!Board::neighbors_ring8(pos(1, 1)).contains(&pos(1, 1)));
    }

    #[test]
    fn test_rows_and_columns() {
        let row: Vec<_> = Board::row(2).collect();
        assert_eq!(row, vec![pos(0, 2), pos(1, 2), pos(2, 2)]);
        let column: Vec<_> = Board::column(1).collect();
        assert_eq!(column, vec![pos(1, 0), pos(1, 1), pos(1, 2)]);
    }

    #[test]
    fn test_empty_and_occupied_queries() {
        let mut board = Board::default();
        board.place(pos(0, 0), orc(), 1);
        board.place(pos(2, 2), orc(), 1);

        assert_eq!(board.occupied_count(), 2);
        assert_eq!(board.empty_tiles().count(), 7);
        assert!(board.occupied_tiles().all(|t| t.occupant.is_some()));
    }

    #[test]
    fn test_decay_counts_down_then_destroys() {
        let generator = TileNumberGenerator::new(TileNumberConfig {
            min: 1,
            max: 1,
            weights: vec![TileWeight::new(1, 1, 9)],
        });
        let mut rng = GameRng::new(11);
        let mut board = Board::new(TileMode::Numbered);
        board.refresh_numbers(&generator, &mut rng);
        board.place(pos(1, 1), orc(), 1);

        // 1 -> 0, card survives
        let destroyed = board.decay_all(&generator, &mut rng);
        assert!(destroyed.is_empty());
        assert_eq!(board.tile(pos(1, 1)).unwrap().tile_number, 0);
        assert!(board.occupant(pos(1, 1)).is_some());

        // 0 -> destroyed, fresh number
        let destroyed = board.decay_all(&generator, &mut rng);
        assert_eq!(destroyed.as_slice(), &[orc()]);
        let tile = board.tile(pos(1, 1)).unwrap();
        assert!(tile.is_empty());
        assert_eq!(tile.tile_number, 1);
    }

    #[test]
    fn test_decay_leaves_positive_empty_tiles() {
        let generator = TileNumberGenerator::default();
        let mut rng = GameRng::new(2);
        let mut board = Board::new(TileMode::Numbered);
        board.refresh_numbers(&generator, &mut rng);
        let before: Vec<_> = board.tiles().map(|t| t.tile_number).collect();

        board.decay_all(&generator, &mut rng);
        let after: Vec<_> = board.tiles().map(|t| t.tile_number).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_mode() {
        let generator = TileNumberGenerator::default();
        let mut rng = GameRng::new(8);
        let mut board = Board::default();

        board.set_mode(TileMode::Numbered, &generator, &mut rng);
        assert_eq!(board.mode(), TileMode::Numbered);
        assert!(board.tiles().all(|t| (1..=3).contains(&t.tile_number)));

        board.set_mode(TileMode::Cleared, &generator, &mut rng);
        assert!(board.tiles().all(|t| t.tile_number == 0));
    }

    #[test]
    fn test_clear_all() {
        let mut board = Board::default();
        board.place(pos(0, 1), orc(), 1);
        board.set_score(pos(0, 1), 9);

        board.clear_all();
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_set_score_ignores_empty_tiles() {
        let mut board = Board::default();
        board.set_score(pos(0, 0), 5);
        assert_eq!(board.tile(pos(0, 0)).unwrap().calculated_score, 0);

        board.place(pos(0, 0), orc(), 1);
        board.set_score(pos(0, 0), 5);
        assert_eq!(board.scores()[0], 5);
    }
}
