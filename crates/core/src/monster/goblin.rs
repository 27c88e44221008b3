use super::*;
use crate::orientation::euclidean;
use crate::path_map::UNREACHABLE;

const PLAYER_SQUARE_SCORE: i32 = 10_000;
const BASE_SCORE: i32 = 1_000;
const SWORD_PENALTY: i32 = 500;
/// Beyond this many squares a brain-guided goblin scores by path distance.
const PATH_SCORING_RANGE: u32 = 3;

pub(super) fn process(ctx: &mut MonsterTurn<'_>, id: MonsterId) -> Outcome {
    let o = if ctx.brain_active || can_find_player(ctx.monster(id), ctx.player) {
        choose_move(ctx, id)
    } else {
        Orientation::None
    };
    commit_move(ctx, id, o);
    Outcome::Done
}

/// Best of the nine candidate squares. Staying put starts as the best with a score
/// of 1 and only a strictly higher score replaces it, so the earliest of equal
/// scores wins.
pub(crate) fn choose_move(ctx: &MonsterTurn<'_>, id: MonsterId) -> Orientation {
    let pos = ctx.monster(id).pos;
    let target = ctx.player.pos;
    let paths = ctx.room.path_map(MovementClass::Ground);
    let by_path =
        ctx.brain_active && chebyshev(pos, target) > PATH_SCORING_RANGE && paths.target() == Some(target);

    let mut best = Orientation::None;
    let mut best_score = 1;
    for dy in -1..=1 {
        for dx in -1..=1 {
            let o = Orientation::from_delta(dx, dy);
            if o != Orientation::None && !is_open_move(ctx.room, ctx.player, id, o) {
                continue;
            }
            let square = pos.step(o);
            let score = if square == target {
                PLAYER_SQUARE_SCORE
            } else {
                let mut score = if by_path {
                    match paths.distance(square) {
                        UNREACHABLE => 0,
                        d => BASE_SCORE - 10 * d as i32,
                    }
                } else {
                    BASE_SCORE - (10.0 * euclidean(square, target)) as i32
                };
                if chebyshev(square, ctx.player.sword_pos()) <= 1 {
                    score -= SWORD_PENALTY;
                }
                score
            };
            if score > best_score {
                best = o;
                best_score = score;
            }
        }
    }
    best
}
