use super::*;

/// Turns clockwise once per turn, SW through N, and hatches on the turn after facing N.
pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    remain_stationary(ctx, id);
    let (pos, facing) = {
        let egg = ctx.monster(id);
        (egg.pos, egg.orientation)
    };
    match facing {
        Orientation::N => {
            ctx.cues.add(CueEvent::EggHatched { pos });
            Outcome::Hatched
        }
        Orientation::None => {
            ctx.monster_mut(id).orientation = Orientation::SW;
            Outcome::Done
        }
        o => {
            ctx.monster_mut(id).orientation = o.rotate_cw();
            Outcome::Done
        }
    }
}
