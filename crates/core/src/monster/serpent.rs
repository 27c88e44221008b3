//! Serpents: a head monster trailing a chain of item-layer body tiles.
//! The head square itself holds no tile. The first body tile sits behind the head,
//! opposite its orientation, and every tile links to its neighbours in the chain.

use super::*;
use crate::tiles::ItemTile;

/// Shortest serpent whose head can reach its own tail.
const LOOPING_LENGTH: usize = 3;
/// Alternates horizontal-first and vertical-first chasing every this many turns.
const PREFERENCE_PERIOD: u32 = 10;

/// Body squares from just behind the head to the tail, in chain order.
pub fn serpent_segments(room: &Room, id: MonsterId) -> Vec<Pos> {
    let Some(head) = room.monster(id) else {
        return Vec::new();
    };
    if !head.orientation.is_cardinal() {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut back = head.orientation.opposite();
    let mut square = head.pos.step(back);
    while room.is_valid(square) && segments.len() < room.calc_area() {
        let Some((a, b)) = room.item(square).serpent_links() else {
            break;
        };
        let toward_previous = back.opposite();
        let next = if a == toward_previous {
            b
        } else if b == Some(toward_previous) {
            Some(a)
        } else {
            break;
        };
        segments.push(square);
        let Some(next) = next else {
            break;
        };
        back = next;
        square = square.step(next);
    }
    segments
}

pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let segments = serpent_segments(ctx.room, id);
    let tail = segments.last().copied().filter(|_| segments.len() >= LOOPING_LENGTH);
    let Some(o) = choose_direction(ctx, id, tail) else {
        remain_stationary(ctx, id);
        return Outcome::Done;
    };

    let head = ctx.monster(id).pos;
    let to = head.step(o);
    if Some(to) == tail {
        ctx.cues.add(CueEvent::SnakeDiedFromTruncation { monster: id });
        return Outcome::Truncated;
    }

    slither(ctx, id, head, o, &segments);
    commit_move(ctx, id, o);
    Outcome::Done
}

/// Grows the body into the old head square and drops the last tail tile.
fn slither(ctx: &mut MonsterTurn<'_>, id: MonsterId, head: Pos, o: Orientation, segments: &[Pos]) {
    let Some((&old_tail, kept)) = segments.split_last() else {
        return;
    };
    ctx.room.plot(old_tail, ItemTile::Empty, None);

    let back = ctx.monster(id).orientation.opposite();
    let head_piece =
        if kept.is_empty() { ItemTile::serpent_tail(o) } else { ItemTile::serpent_body(o, back) };
    ctx.room.plot(head, head_piece, Some(id));

    if let Some((&new_tail, rest)) = kept.split_last() {
        let previous = rest.last().copied().unwrap_or(head);
        let toward = Orientation::toward(previous.x - new_tail.x, previous.y - new_tail.y);
        ctx.room.plot(new_tail, ItemTile::serpent_tail(toward), Some(id));
    }
}

fn choose_direction(ctx: &MonsterTurn<'_>, id: MonsterId, tail: Option<Pos>) -> Option<Orientation> {
    let open = |o: Orientation| can_slither(ctx, id, o, tail);
    let serpent = ctx.monster(id);

    if ctx.brain_active {
        let paths = ctx.room.path_map(MovementClass::Ground);
        if paths.target() == Some(ctx.player.pos)
            && let Some(o) = paths.rec_paths(serpent.pos).into_iter().find(|&o| o.is_cardinal() && open(o))
        {
            return Some(o);
        }
    }

    if can_find_player(serpent, ctx.player) {
        let dx = (ctx.player.pos.x - serpent.pos.x).signum();
        let dy = (ctx.player.pos.y - serpent.pos.y).signum();
        let horizontal = (dx != 0).then(|| Orientation::from_delta(dx, 0));
        let vertical = (dy != 0).then(|| Orientation::from_delta(0, dy));
        let preferred = if ctx.turn_no % PREFERENCE_PERIOD < PREFERENCE_PERIOD / 2 {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };
        if let Some(o) = preferred.into_iter().flatten().find(|&o| open(o)) {
            return Some(o);
        }
    } else if serpent.orientation.is_cardinal() && open(serpent.orientation) {
        return Some(serpent.orientation);
    }

    Orientation::CARDINAL.into_iter().find(|&o| open(o))
}

/// Open cardinal step, counting the serpent's own tail as reachable.
fn can_slither(ctx: &MonsterTurn<'_>, id: MonsterId, o: Orientation, tail: Option<Pos>) -> bool {
    let from = ctx.monster(id).pos;
    let to = from.step(o);
    if Some(to) == tail {
        return !blocks_arrow_movement(ctx.room.item(from), o);
    }
    is_open_move(ctx.room, ctx.player, id, o)
}
