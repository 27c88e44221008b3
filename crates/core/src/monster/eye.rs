use super::*;

pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let MonsterBody::EvilEye { awake } = ctx.monster(id).body else {
        unreachable!("evil eye rules run only for evil eyes");
    };
    if awake {
        approach(ctx, id);
        return Outcome::Done;
    }
    remain_stationary(ctx, id);
    if sees_player(ctx, id) {
        ctx.monster_mut(id).body = MonsterBody::EvilEye { awake: true };
        ctx.cues.add(CueEvent::EvilEyeWoke { monster: id });
    }
    Outcome::Done
}

/// Looks straight ahead until something opaque or another monster is in the way.
fn sees_player(ctx: &MonsterTurn<'_>, id: MonsterId) -> bool {
    let eye = ctx.monster(id);
    if !ctx.player.visible || eye.orientation == Orientation::None {
        return false;
    }
    let mut square = eye.pos.step(eye.orientation);
    while ctx.room.is_valid(square) {
        if square == ctx.player.pos {
            return true;
        }
        if ctx.room.opaque(square).blocks_sight() || ctx.room.monster_at(square).is_some() {
            return false;
        }
        square = square.step(eye.orientation);
    }
    false
}
