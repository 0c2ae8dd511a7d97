//! Per-type scoring rules.
//!
//! Each occupied tile starts from its card's base score and applies exactly
//! one rule selected by the card's type. Rules never touch the board; they
//! only push `ScoreModifier`s, which is what keeps the scoring pass and the
//! breakdown path identical.

use rustc_hash::FxHashSet;

use super::breakdown::{Modifiers, ScoreModifier};
use super::stats::GlobalScoreData;
use crate::board::{Board, Position};
use crate::cards::{CardInstance, CardType};

/// Inputs a rule may read.
pub(crate) struct RuleContext<'a> {
    pub board: &'a Board,
    pub global: &'a GlobalScoreData,
    pub pos: Position,
    pub card: CardInstance,
    pub placed_turn: u32,
}

impl RuleContext<'_> {
    fn orthogonal(&self) -> impl Iterator<Item = CardInstance> + '_ {
        Board::neighbors4(self.pos)
            .into_iter()
            .filter_map(|p| self.board.occupant(p))
    }

    fn same_type_neighbors(&self) -> usize {
        self.orthogonal()
            .filter(|c| c.card_type == self.card.card_type)
            .count()
    }
}

fn push(out: &mut Modifiers, description: &'static str, delta: i32, rationale: String) {
    if delta != 0 {
        out.push(ScoreModifier {
            description,
            delta,
            rationale,
        });
    }
}

fn as_delta(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// −1 per other copy of this type anywhere on the board.
fn unique_penalty(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let others = ctx.global.count(ctx.card.card_type).saturating_sub(1);
    push(
        out,
        "Unique",
        -as_delta(others),
        format!("{others} other {} on the board", ctx.card.card_type),
    );
}

/// Apply the rule for the tile's card type.
pub(crate) fn apply(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    match ctx.card.card_type {
        CardType::Orc => orc(ctx, out),
        CardType::Werewolf => werewolf(ctx, out),
        CardType::Goblin => goblin(ctx, out),
        CardType::Elf => elf(ctx, out),
        CardType::Dwarf => dwarf(ctx, out),
        CardType::Angel => angel(ctx, out),
        CardType::Dragon => dragon(ctx, out),
        CardType::Devil => devil(ctx, out),
        CardType::Vampire => vampire(ctx, out),
        CardType::Naga => naga(ctx, out),
        CardType::Robot => robot(ctx, out),
        CardType::Slime => slime(ctx, out),
    }
}

fn orc(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let same = ctx.same_type_neighbors();
    if same >= 1 {
        push(out, "Crowded", -1, format!("{same} adjacent Orc"));
    }
}

fn werewolf(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let different = ctx
        .orthogonal()
        .filter(|c| c.card_type != ctx.card.card_type)
        .count();
    if different >= 2 {
        push(out, "Pack hunt", 1, format!("{different} adjacent non-Werewolf"));
    }
}

fn goblin(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let same = ctx.same_type_neighbors();
    push(out, "Horde", 2 * as_delta(same), format!("{same} adjacent Goblin"));
}

fn elf(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    unique_penalty(ctx, out);
    let empty = ctx.global.empty_tile_count;
    push(out, "Open ground", -as_delta(empty), format!("{empty} empty tiles"));
}

fn dwarf(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    match ctx.same_type_neighbors() {
        0 => {}
        1 => push(out, "Partner", 1, "exactly 1 adjacent Dwarf".to_string()),
        n => push(out, "Crowded", -1, format!("{n} adjacent Dwarf")),
    }
}

fn angel(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let unique = ctx.global.unique_type_count_excluding_designated;
    push(
        out,
        "Harmony",
        as_delta(unique),
        format!("{unique} other types on the board"),
    );
    unique_penalty(ctx, out);
}

fn dragon(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let ring = Board::neighbors_ring8(ctx.pos).len();
    push(out, "Territory", as_delta(ring), format!("{ring} surrounding tiles"));
    unique_penalty(ctx, out);
    let occupied = ctx.orthogonal().count();
    push(
        out,
        "Hemmed in",
        -as_delta(occupied),
        format!("{occupied} occupied orthogonal tiles"),
    );
}

fn devil(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let rivals = Board::row(ctx.pos.y)
        .filter(|&p| p != ctx.pos)
        .filter_map(|p| ctx.board.occupant(p))
        .any(|c| c.card_type == CardType::Devil);
    if !rivals {
        push(out, "Sole ruler", 1, format!("no other Devil in row {}", ctx.pos.y));
    }
}

fn vampire(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let prey = Board::column(ctx.pos.x)
        .filter(|&p| p != ctx.pos)
        .filter_map(|p| ctx.board.occupant(p))
        .filter(|c| c.card_type != CardType::Vampire)
        .count();
    push(
        out,
        "Feeding",
        as_delta(prey),
        format!("{prey} other types in column {}", ctx.pos.x),
    );
}

fn naga(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let kinds: FxHashSet<CardType> = Board::neighbors_ring8(ctx.pos)
        .into_iter()
        .filter_map(|p| ctx.board.occupant(p))
        .map(|c| c.card_type)
        .collect();
    push(
        out,
        "Diversity",
        2 * as_delta(kinds.len()),
        format!("{} distinct types surrounding", kinds.len()),
    );
}

fn robot(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    if ctx.board.occupant(Position::center()).is_none() {
        push(out, "Clear core", 7, "center tile is empty".to_string());
    }
}

fn slime(ctx: &RuleContext<'_>, out: &mut Modifiers) {
    let copies = ctx.global.count(CardType::Slime);
    push(out, "Merge", 5 * as_delta(copies), format!("{copies} Slime on the board"));

    let same_turn = ctx
        .board
        .occupied_tiles()
        .filter(|t| t.placed_turn == ctx.placed_turn)
        .filter(|t| t.occupant.is_some_and(|c| c.card_type == CardType::Slime))
        .count();
    if same_turn >= 2 {
        push(
            out,
            "Overflow",
            -10,
            format!("{same_turn} Slime placed on turn {}", ctx.placed_turn),
        );
    }
}
