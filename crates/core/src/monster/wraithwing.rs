use super::*;

/// Player distances of two wraithwings this close count as a pack.
const PACK_BAND: u32 = 2;
/// A lone wraithwing circles at this many squares from the player.
const HOLD_DISTANCE: u32 = 4;

pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let me = ctx.monster(id);
    if !can_find_player(me, ctx.player) && !ctx.brain_active {
        remain_stationary(ctx, id);
        return Outcome::Done;
    }
    let distance = chebyshev(me.pos, ctx.player.pos);
    let pack = ctx.room.live_monsters().any(|(other, m)| {
        other != id
            && m.kind() == MonsterKind::WraithWing
            && chebyshev(m.pos, ctx.player.pos).abs_diff(distance) <= PACK_BAND
    });

    let o = if pack || distance > HOLD_DISTANCE {
        direct_movement(ctx, id)
    } else if distance < HOLD_DISTANCE {
        flee_movement(ctx, id)
    } else {
        Orientation::None
    };
    commit_move(ctx, id, o);
    Outcome::Done
}
