use std::collections::BTreeSet;

use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use room_core::hold::{Entrance, HoldData, LevelData};
use room_core::monster::MonsterKind;
use room_core::room_data::{OrbAction, OrbAgent};
use room_core::tiles::{ItemTile, OpaqueTile};
use room_core::{
    Command, CueKind, CurrentGame, EngineConfig, GameStatus, LevelId, MemoryHold, NullPersistence,
    Orientation, RoomCoords, RoomData, RoomId,
};

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn fuzz_hold() -> HoldData {
    let mut room = RoomData::open(RoomId(1), LevelId(1), RoomCoords { x: 0, y: 0 }, 16, 12);
    for x in 3..9 {
        room.set_opaque(x, 4, OpaqueTile::Wall);
    }
    room.set_opaque(10, 4, OpaqueTile::DoorYellow)
        .set_opaque(10, 5, OpaqueTile::DoorYellow)
        .set_opaque(1, 10, OpaqueTile::Pit)
        .set_opaque(14, 1, OpaqueTile::Trapdoor)
        .set_opaque(0, 0, OpaqueTile::DoorGreen);
    for (x, y) in [(12, 7), (13, 7), (12, 8), (13, 8), (14, 8), (14, 9)] {
        room.set_item(x, y, ItemTile::Tar);
    }
    room.set_item(6, 9, ItemTile::PotionMimic)
        .set_item(2, 2, ItemTile::ArrowS)
        .set_item(4, 11, ItemTile::SnakeEW)
        .set_item(5, 11, ItemTile::SnakeTailW);
    room.add_orb(9, 9, vec![OrbAgent { action: OrbAction::Toggle, x: 10, y: 4 }]);
    room.add_scroll(7, 1, "mind the tar");
    room.add_monster(MonsterKind::Roach, 1, 1, Orientation::S)
        .add_monster(MonsterKind::Goblin, 15, 0, Orientation::W)
        .add_monster(MonsterKind::RoachEgg, 4, 7, Orientation::SW)
        .add_monster(MonsterKind::TarMother, 12, 7, Orientation::N)
        .add_monster(MonsterKind::WraithWing, 8, 10, Orientation::N)
        .add_monster(MonsterKind::EvilEye, 15, 6, Orientation::W)
        .add_monster(MonsterKind::Brain, 15, 11, Orientation::N)
        .add_monster(MonsterKind::Neather, 3, 6, Orientation::N)
        .add_monster(MonsterKind::Serpent, 3, 11, Orientation::W);
    room.monsters[7].question = Some("Friend or foe?".into());
    HoldData {
        name: "fuzz".into(),
        levels: vec![LevelData {
            id: LevelId(1),
            entrance: Entrance { room: RoomId(1), x: 8, y: 6, orientation: Orientation::N },
            exits: Vec::new(),
        }],
        rooms: vec![room],
    }
}

const ALL_COMMANDS: [Command; 13] = [
    Command::NorthWest,
    Command::North,
    Command::NorthEast,
    Command::West,
    Command::Wait,
    Command::East,
    Command::SouthWest,
    Command::South,
    Command::SouthEast,
    Command::Clockwise,
    Command::CounterClockwise,
    Command::Yes,
    Command::No,
];

fn check_invariants(game: &CurrentGame) -> Result<(), String> {
    let room = game.room();
    let mut seen = BTreeSet::new();
    for (id, monster) in room.live_monsters() {
        if !room.is_valid(monster.pos) {
            return Err(format!("monster {id:?} off the grid at {:?}", monster.pos));
        }
        if !seen.insert(monster.pos) {
            return Err(format!("two monsters share {:?}", monster.pos));
        }
        if room.monster_at(monster.pos) != Some(id) {
            return Err(format!("occupancy for {:?} does not name {id:?}", monster.pos));
        }
    }
    if !room.is_valid(game.player().pos) {
        return Err(format!("player off the grid at {:?}", game.player().pos));
    }
    Ok(())
}

fn run_fuzz_session(seed: u64, max_turns: u32) -> Result<(), String> {
    let mut game = CurrentGame::new(
        Box::new(MemoryHold::new(fuzz_hold())),
        Box::new(NullPersistence),
        EngineConfig::default(),
        LevelId(1),
    )
    .map_err(|e| e.to_string())?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for _ in 0..max_turns {
        let before = game.turn_no();
        let room_before = game.room().id;
        let command = match game.status() {
            GameStatus::Active if rng.next_u64() % 50 == 0 => Command::Restart,
            GameStatus::Active => choose(&mut rng, &ALL_COMMANDS),
            GameStatus::Dying => Command::Restart,
            GameStatus::AwaitingTransition => return Ok(()),
        };
        let answered = game.process_command(command).has_occurred(CueKind::QuestionAnswered);

        if command != Command::Restart && game.room().id == room_before {
            let expected = if answered { before } else { before + 1 };
            if game.turn_no() != expected {
                return Err(format!("turn went {before} -> {} on {command:?}", game.turn_no()));
            }
        }
        check_invariants(&game)?;
    }
    Ok(())
}

#[test]
fn semantic_fuzz_holds_invariants() {
    let mut runner = TestRunner::new(ProptestConfig { cases: 48, ..ProptestConfig::default() });
    let result = runner.run(&any::<u64>(), |seed| {
        run_fuzz_session(seed, 400).map_err(TestCaseError::fail)
    });
    if let Err(e) = result {
        panic!("semantic fuzz failed: {e}");
    }
}

#[test]
fn fixed_seeds_smoke() {
    for seed in [0, 1, 2, 3, 42] {
        run_fuzz_session(seed, 250).unwrap_or_else(|e| panic!("seed {seed}: {e}"));
    }
}
