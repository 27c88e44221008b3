use super::*;

pub const TAR_CYCLE: u32 = 30;
/// Eyes shut while a sword is inside this Chebyshev box.
const SCARE_RANGE: u32 = 3;
/// Eyes also shut for this many turns at the end of each cycle.
const CLOSED_TURNS: u32 = 2;

/// Tar mothers never move. They keep their eyes updated and, once per cycle,
/// ask the room to grow tar.
pub(super) fn process_mother(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    remain_stationary(ctx, id);
    let mother = ctx.monster(id);
    let pos = mother.pos;
    let senses = can_find_player(mother, ctx.player) || ctx.brain_active;

    let sword_near = chebyshev(ctx.player.sword_pos(), pos) <= SCARE_RANGE
        || ctx
            .room
            .live_monsters()
            .filter_map(|(_, m)| m.sword_pos())
            .any(|sword| chebyshev(sword, pos) <= SCARE_RANGE);
    let closing = ctx.turn_no % TAR_CYCLE >= TAR_CYCLE - CLOSED_TURNS;
    if let MonsterBody::TarMother { eyes_open, .. } = &mut ctx.monster_mut(id).body {
        *eyes_open = !(sword_near || closing);
    }

    if ctx.turn_no % TAR_CYCLE == 0 && senses {
        ctx.room.request_tar_growth();
        ctx.cues.add_once(CueEvent::TarGrew);
    }
    Outcome::Done
}
