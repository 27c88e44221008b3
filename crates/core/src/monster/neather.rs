use super::*;

/// Runs from the player and leaves through the room edge when it can. The first time
/// it finds the player it asks its question instead of moving; answering "no" turns
/// it hostile.
pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    remain_stationary(ctx, id);
    let neather = ctx.monster(id);
    let finds = can_find_player(neather, ctx.player);
    let (question, asked, hostile) = match &neather.body {
        MonsterBody::Neather { question, asked, hostile } => (question.clone(), *asked, *hostile),
        _ => unreachable!("neather rules run only for the neather"),
    };

    if finds && !asked && let Some(text) = question {
        if let MonsterBody::Neather { asked, .. } = &mut ctx.monster_mut(id).body {
            *asked = true;
        }
        ctx.cues.add(CueEvent::MonsterSpokeWithQuestion { monster: id, text: text.clone() });
        return Outcome::Asked { text };
    }

    if hostile {
        approach(ctx, id);
        return Outcome::Done;
    }
    if !finds {
        return Outcome::Done;
    }

    let pos = ctx.monster(id).pos;
    for o in beeline_candidates(pos, ctx.player.pos, true) {
        if !ctx.room.is_valid(pos.step(o)) {
            ctx.cues.add(CueEvent::NeatherExitedRoom { monster: id });
            return Outcome::ExitedRoom;
        }
        if is_open_move(ctx.room, ctx.player, id, o) {
            commit_move(ctx, id, o);
            return Outcome::Done;
        }
    }
    Outcome::Done
}
