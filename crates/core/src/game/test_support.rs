//! Shared fixtures for the `game` test suite.
//! This module exists to avoid repeating hold and room setup across many tests.
//! It does not own production gameplay logic.

use super::*;
use crate::hold::{Entrance, HoldData, LevelData, LevelExit, MemoryHold};
use crate::persistence::{NullPersistence, RecordingPersistence};
use crate::room_data::RoomData;

pub(super) const LEVEL: LevelId = LevelId(1);
pub(super) const ROOM: RoomId = RoomId(1);
pub(super) const EAST_ROOM: RoomId = RoomId(2);

/// A 10x10 all-floor room at the origin of level 1.
pub(super) fn open_room() -> RoomData {
    RoomData::open(ROOM, LEVEL, RoomCoords { x: 0, y: 0 }, 10, 10)
}

/// Another 10x10 room directly east of `open_room`.
pub(super) fn east_room() -> RoomData {
    RoomData::open(EAST_ROOM, LEVEL, RoomCoords { x: 1, y: 0 }, 10, 10)
}

pub(super) fn hold_with(rooms: Vec<RoomData>, x: i32, y: i32, orientation: Orientation) -> HoldData {
    HoldData {
        name: "fixture".into(),
        levels: vec![LevelData {
            id: LEVEL,
            entrance: Entrance { room: rooms[0].id, x, y, orientation },
            exits: Vec::new(),
        }],
        rooms,
    }
}

/// Adds a second level made of a single open room, reached through exit region 0
/// of the first room.
pub(super) fn with_second_level(mut hold: HoldData) -> HoldData {
    let room = RoomData::open(RoomId(10), LevelId(2), RoomCoords { x: 0, y: 0 }, 10, 10);
    hold.levels[0].exits.push(LevelExit { room: hold.rooms[0].id, region: 0, target: Some(LevelId(2)) });
    hold.levels.push(LevelData {
        id: LevelId(2),
        entrance: Entrance { room: room.id, x: 5, y: 5, orientation: Orientation::N },
        exits: Vec::new(),
    });
    hold.rooms.push(room);
    hold
}

pub(super) fn start(hold: HoldData) -> CurrentGame {
    CurrentGame::new(
        Box::new(MemoryHold::new(hold)),
        Box::new(NullPersistence),
        EngineConfig::default(),
        LEVEL,
    )
    .expect("fixture hold loads")
}

pub(super) fn start_recording(hold: HoldData, config: EngineConfig) -> (CurrentGame, RecordingPersistence) {
    let persistence = RecordingPersistence::new();
    let game = CurrentGame::new(
        Box::new(MemoryHold::new(hold)),
        Box::new(persistence.clone()),
        config,
        LEVEL,
    )
    .expect("fixture hold loads");
    (game, persistence)
}

/// The player alone in `room`, at (x, y) facing `orientation`.
pub(super) fn game_in(room: RoomData, x: i32, y: i32, orientation: Orientation) -> CurrentGame {
    start(hold_with(vec![room], x, y, orientation))
}

pub(super) fn monster_positions(game: &CurrentGame) -> Vec<(MonsterKind, Pos)> {
    game.room().live_monsters().map(|(_, m)| (m.kind(), m.pos)).collect()
}
