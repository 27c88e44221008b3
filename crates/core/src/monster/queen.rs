use tracing::debug;

use super::*;
use crate::tiles::{ItemTile, OpaqueTile};

pub const EGG_CYCLE: u32 = 30;

pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let o = flee_movement(ctx, id);
    commit_move(ctx, id, o);
    if ctx.turn_no % EGG_CYCLE == 0 {
        lay_eggs(ctx, id);
    }
    Outcome::Done
}

fn lay_eggs(ctx: &mut MonsterTurn<'_>, id: MonsterId) {
    let center = ctx.monster(id).pos;
    let mut count = 0;
    for o in Orientation::COMPASS {
        let pos = center.step(o);
        if !can_hold_egg(ctx, pos) {
            continue;
        }
        ctx.room.add_monster(Monster::new(MonsterBody::RoachEgg, pos, Orientation::SW));
        count += 1;
    }
    if count > 0 {
        debug!(?center, count, "roach queen laid eggs");
        ctx.cues.add(CueEvent::EggsLaid { count });
    }
}

fn can_hold_egg(ctx: &MonsterTurn<'_>, pos: Pos) -> bool {
    ctx.room.is_valid(pos)
        && ctx.room.opaque(pos) == OpaqueTile::Floor
        && ctx.room.item(pos) == ItemTile::Empty
        && ctx.room.monster_at(pos).is_none()
        && pos != ctx.player.pos
        && !sword_at(ctx.room, ctx.player, pos)
}
