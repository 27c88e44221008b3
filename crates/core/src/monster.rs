//! Monster records and the movement rules every monster kind shares.
//! Each kind's per-turn decision lives in its own submodule as a free function;
//! `process` dispatches on the kind. Deciding is done here; consequences that reach
//! beyond the monster itself (spawning, truncation, sword hits) are reported back as
//! an `Outcome` for the turn engine to apply.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::cue::{CueEvent, CueEvents};
use crate::orientation::{Orientation, chebyshev};
use crate::room::Room;
use crate::swordsman::Swordsman;
use crate::tiles::{MoveCaps, blocks_arrow_movement};
use crate::types::{MonsterId, MovementClass, Pos};

mod egg;
mod eye;
mod goblin;
mod mimic;
mod neather;
mod queen;
mod serpent;
mod tar;
mod wraithwing;

pub use serpent::serpent_segments;

/// A monster that cannot see an invisible player still smells it this close.
pub const SMELL_RADIUS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeSide {
    Left,
    Right,
}

/// Kind tag plus whatever state that kind carries between turns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(MonsterKind), derive(Hash, PartialOrd, Ord, Serialize, Deserialize))]
pub enum MonsterBody {
    Roach,
    RoachQueen,
    RoachEgg,
    Goblin,
    EvilEye { awake: bool },
    WraithWing,
    TarMother { eye: EyeSide, eyes_open: bool },
    TarBaby,
    Serpent,
    Mimic,
    Brain,
    Neather { question: Option<String>, asked: bool, hostile: bool },
}

impl MonsterBody {
    pub fn new(kind: MonsterKind, question: Option<String>) -> Self {
        match kind {
            MonsterKind::Roach => Self::Roach,
            MonsterKind::RoachQueen => Self::RoachQueen,
            MonsterKind::RoachEgg => Self::RoachEgg,
            MonsterKind::Goblin => Self::Goblin,
            MonsterKind::EvilEye => Self::EvilEye { awake: false },
            MonsterKind::WraithWing => Self::WraithWing,
            MonsterKind::TarMother => Self::TarMother { eye: EyeSide::Left, eyes_open: true },
            MonsterKind::TarBaby => Self::TarBaby,
            MonsterKind::Serpent => Self::Serpent,
            MonsterKind::Mimic => Self::Mimic,
            MonsterKind::Brain => Self::Brain,
            MonsterKind::Neather => Self::Neather { question, asked: false, hostile: false },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub body: MonsterBody,
    pub pos: Pos,
    pub prev_pos: Pos,
    pub orientation: Orientation,
    /// Position in spawn order; never reused within a room visit.
    pub process_seq: u32,
    /// Set on spawn; a flagged monster is skipped by the monster phase it appears in.
    pub first_turn: bool,
    pub alive: bool,
}

impl Monster {
    pub fn new(body: MonsterBody, pos: Pos, orientation: Orientation) -> Self {
        Self {
            body,
            pos,
            prev_pos: pos,
            orientation,
            process_seq: 0,
            first_turn: true,
            alive: true,
        }
    }

    pub fn kind(&self) -> MonsterKind {
        MonsterKind::from(&self.body)
    }

    pub fn movement_class(&self) -> MovementClass {
        match self.kind() {
            MonsterKind::WraithWing => MovementClass::Air,
            _ => MovementClass::Ground,
        }
    }

    pub fn caps(&self) -> MoveCaps {
        match self.kind() {
            MonsterKind::WraithWing => MoveCaps::FLIES,
            MonsterKind::Mimic => MoveCaps::DRINKS_POTIONS,
            MonsterKind::Serpent => MoveCaps::SERPENT | MoveCaps::IGNORES_SWORD,
            _ => MoveCaps::empty(),
        }
    }

    pub fn counts_for_conquest(&self) -> bool {
        self.kind() != MonsterKind::Mimic
    }

    /// Square covered by a mimic's sword.
    pub fn sword_pos(&self) -> Option<Pos> {
        (self.kind() == MonsterKind::Mimic && self.orientation != Orientation::None)
            .then(|| self.pos.step(self.orientation))
    }

    pub fn is_stab_immune(&self) -> bool {
        self.kind() == MonsterKind::Serpent
    }
}

/// What the player did this turn, as far as mimics care.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    None,
    Moved(Orientation),
    Rotated { clockwise: bool },
}

/// Effects of one monster's turn that the turn engine must apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Done,
    SwordMoved,
    Hatched,
    ExitedRoom,
    Truncated,
    Asked { text: String },
}

/// Everything a monster may consult or change while it decides.
pub(crate) struct MonsterTurn<'a> {
    pub room: &'a mut Room,
    pub player: &'a Swordsman,
    pub cues: &'a mut CueEvents,
    pub turn_no: u32,
    pub brain_active: bool,
    pub player_action: PlayerAction,
}

impl MonsterTurn<'_> {
    pub fn monster(&self, id: MonsterId) -> &Monster {
        self.room.monster(id).expect("processed monster exists")
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> &mut Monster {
        self.room.monster_mut(id).expect("processed monster exists")
    }
}

pub(crate) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    match ctx.monster(id).kind() {
        MonsterKind::Roach | MonsterKind::TarBaby => {
            approach(ctx, id);
            Outcome::Done
        }
        MonsterKind::RoachQueen => queen::process(ctx, id),
        MonsterKind::RoachEgg => egg::process(ctx, id),
        MonsterKind::Goblin => goblin::process(ctx, id),
        MonsterKind::EvilEye => eye::process(ctx, id),
        MonsterKind::WraithWing => wraithwing::process(ctx, id),
        MonsterKind::TarMother => tar::process_mother(ctx, id),
        MonsterKind::Serpent => serpent::process(ctx, id),
        MonsterKind::Mimic => mimic::process(ctx, id),
        MonsterKind::Neather => neather::process(ctx, id),
        MonsterKind::Brain => Outcome::Done,
    }
}

/// Sees the player, or smells an invisible one within `SMELL_RADIUS`.
pub fn can_find_player(monster: &Monster, player: &Swordsman) -> bool {
    player.visible || chebyshev(monster.pos, player.pos) <= SMELL_RADIUS
}

/// Whether a live brain currently senses the player.
pub fn brain_senses_player(room: &Room, player: &Swordsman) -> bool {
    room.live_monsters()
        .any(|(_, m)| m.kind() == MonsterKind::Brain && can_find_player(m, player))
}

/// Whether the player's sword or any live mimic's sword covers `pos`.
pub fn sword_at(room: &Room, player: &Swordsman, pos: Pos) -> bool {
    player.sword_pos() == pos
        || room.live_monsters().any(|(_, m)| m.sword_pos() == Some(pos))
}

/// Whether monster `id` may step from its square in direction `o`.
pub(crate) fn is_open_move(room: &Room, player: &Swordsman, id: MonsterId, o: Orientation) -> bool {
    if o == Orientation::None {
        return false;
    }
    let monster = room.monster(id).expect("moving monster exists");
    let from = monster.pos;
    let to = from.step(o);
    if !room.is_valid(to) {
        return false;
    }
    if blocks_arrow_movement(room.item(from), o) || blocks_arrow_movement(room.item(to), o) {
        return false;
    }
    let caps = monster.caps();
    if room.tiles_block(to, caps) {
        return false;
    }
    if room.monster_at(to).is_some_and(|other| other != id) {
        return false;
    }
    // A mimic's own sword moves with it.
    let other_sword = player.sword_pos() == to
        || room.live_monsters().any(|(other, m)| other != id && m.sword_pos() == Some(to));
    if !caps.contains(MoveCaps::IGNORES_SWORD) && other_sword {
        return false;
    }
    if monster.kind() == MonsterKind::Mimic && to == player.pos {
        return false;
    }
    true
}

/// Steps toward (or away from) `target` in the order a beeline tries them:
/// the full diagonal, then its horizontal part, then its vertical part.
pub(crate) fn beeline_candidates(from: Pos, target: Pos, flee: bool) -> ArrayVec<Orientation, 3> {
    let (mut dx, mut dy) = ((target.x - from.x).signum(), (target.y - from.y).signum());
    if flee {
        (dx, dy) = (-dx, -dy);
    }
    let mut candidates = ArrayVec::new();
    if dx == 0 && dy == 0 {
        return candidates;
    }
    candidates.push(Orientation::from_delta(dx, dy));
    if dx != 0 && dy != 0 {
        candidates.push(Orientation::from_delta(dx, 0));
        candidates.push(Orientation::from_delta(0, dy));
    }
    candidates
}

pub(crate) fn beeline(ctx: &MonsterTurn<'_>, id: MonsterId, target: Pos, flee: bool) -> Orientation {
    beeline_candidates(ctx.monster(id).pos, target, flee)
        .into_iter()
        .find(|&o| is_open_move(ctx.room, ctx.player, id, o))
        .unwrap_or(Orientation::None)
}

/// Direction from the brain path map, if a brain is guiding and the step is open.
pub(crate) fn brain_direction(ctx: &MonsterTurn<'_>, id: MonsterId) -> Option<Orientation> {
    if !ctx.brain_active {
        return None;
    }
    let monster = ctx.monster(id);
    let paths = ctx.room.path_map(monster.movement_class());
    if paths.target() != Some(ctx.player.pos) {
        return None;
    }
    let o = paths.direction(monster.pos);
    is_open_move(ctx.room, ctx.player, id, o).then_some(o)
}

/// Brain path, else beeline when the player can be found, else stay put.
pub(crate) fn direct_movement(ctx: &MonsterTurn<'_>, id: MonsterId) -> Orientation {
    if let Some(o) = brain_direction(ctx, id) {
        return o;
    }
    if can_find_player(ctx.monster(id), ctx.player) {
        return beeline(ctx, id, ctx.player.pos, false);
    }
    Orientation::None
}

pub(crate) fn flee_movement(ctx: &MonsterTurn<'_>, id: MonsterId) -> Orientation {
    if !can_find_player(ctx.monster(id), ctx.player) {
        return Orientation::None;
    }
    beeline(ctx, id, ctx.player.pos, true)
}

/// Commits a step chosen by a decision function, killing the player if the monster
/// lands on them. `Orientation::None` is an explicit stay.
pub(crate) fn commit_move(ctx: &mut MonsterTurn<'_>, id: MonsterId, o: Orientation) {
    if o == Orientation::None {
        remain_stationary(ctx, id);
        return;
    }
    let to = ctx.monster(id).pos.step(o);
    ctx.room.move_monster(id, to);
    ctx.monster_mut(id).orientation = o;
    if to == ctx.player.pos && !ctx.player.dying {
        ctx.cues.add(CueEvent::MonsterKilledPlayer { monster: id });
    }
}

pub(crate) fn remain_stationary(ctx: &mut MonsterTurn<'_>, id: MonsterId) {
    let monster = ctx.monster_mut(id);
    monster.prev_pos = monster.pos;
}

fn approach(ctx: &mut MonsterTurn<'_>, id: MonsterId) {
    let o = direct_movement(ctx, id);
    commit_move(ctx, id, o);
}
