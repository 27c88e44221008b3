use super::*;

/// Repeats whatever the player actually did this turn.
pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let sword_before = ctx.monster(id).sword_pos();
    match ctx.player_action {
        PlayerAction::None => remain_stationary(ctx, id),
        PlayerAction::Rotated { clockwise } => {
            remain_stationary(ctx, id);
            let mimic = ctx.monster_mut(id);
            mimic.orientation =
                if clockwise { mimic.orientation.rotate_cw() } else { mimic.orientation.rotate_ccw() };
        }
        PlayerAction::Moved(o) => {
            if is_open_move(ctx.room, ctx.player, id, o) {
                let to = ctx.monster(id).pos.step(o);
                ctx.room.move_monster(id, to);
            } else {
                remain_stationary(ctx, id);
            }
        }
    }
    if ctx.monster(id).sword_pos() != sword_before {
        Outcome::SwordMoved
    } else {
        Outcome::Done
    }
}
