use std::fs;

use room_core::hold::{Entrance, HoldData, LevelData};
use room_core::journal_file::{JournalWriter, load_journal_from_file};
use room_core::monster::MonsterKind;
use room_core::replay::replay_journal;
use room_core::{
    Command, CurrentGame, EngineConfig, GameStatus, LevelId, MemoryHold, NullPersistence,
    Orientation, RoomCoords, RoomData, RoomId,
};

fn hold() -> HoldData {
    let mut west = RoomData::open(RoomId(1), LevelId(1), RoomCoords { x: 0, y: 0 }, 10, 10);
    west.add_monster(MonsterKind::Goblin, 1, 8, Orientation::N);
    west.add_monster(MonsterKind::Roach, 8, 1, Orientation::S);
    let mut east = RoomData::open(RoomId(2), LevelId(1), RoomCoords { x: 1, y: 0 }, 10, 10);
    east.add_monster(MonsterKind::Roach, 7, 7, Orientation::N);
    HoldData {
        name: "journal".into(),
        levels: vec![LevelData {
            id: LevelId(1),
            entrance: Entrance { room: RoomId(1), x: 5, y: 5, orientation: Orientation::E },
            exits: Vec::new(),
        }],
        rooms: vec![west, east],
    }
}

/// Play a session while writing every command to a JSONL journal, then load the file
/// and replay it against a fresh copy of the hold. The final state must match.
#[test]
fn file_journal_replay_matches_the_live_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");
    let memory = MemoryHold::new(hold());
    let hold_hash = memory.content_hash();

    let mut game = CurrentGame::new(
        Box::new(memory),
        Box::new(NullPersistence),
        EngineConfig::default(),
        LevelId(1),
    )
    .unwrap();
    let mut writer = JournalWriter::create(&path, LevelId(1), "test", hold_hash).unwrap();

    let script = [
        Command::Clockwise,
        Command::Wait,
        Command::East,
        Command::East,
        Command::East,
        Command::East,
        Command::East,
        Command::South,
        Command::CounterClockwise,
        Command::Wait,
    ];
    for command in script {
        if game.status() == GameStatus::Dying {
            writer.append(game.turn_no(), Command::Restart).unwrap();
            game.process_command(Command::Restart);
        }
        writer.append(game.turn_no(), command).unwrap();
        game.process_command(command);
    }
    drop(writer);

    let loaded = load_journal_from_file(&path).unwrap();
    assert!(loaded.journal.records.len() >= script.len());
    assert_eq!(loaded.journal.hold_hash, hold_hash);

    let result = replay_journal(MemoryHold::new(hold()), &loaded.journal).unwrap();
    assert_eq!(result.final_room, game.room().id);
    assert_eq!(result.final_turn, game.turn_no());
    assert_eq!(result.checksum, game.checksum());
    assert_eq!(result.state_hash, game.state_hash());
}

#[test]
fn resumed_journal_still_replays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resumed.jsonl");
    let hold_hash = MemoryHold::new(hold()).content_hash();

    let mut writer = JournalWriter::create(&path, LevelId(1), "test", hold_hash).unwrap();
    writer.append(0, Command::North).unwrap();
    drop(writer);

    let loaded = load_journal_from_file(&path).unwrap();
    let mut writer =
        JournalWriter::resume(&path, loaded.last_sha256_hex, loaded.next_seq).unwrap();
    writer.append(1, Command::North).unwrap();
    drop(writer);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);

    let journal = load_journal_from_file(&path).unwrap().journal;
    let result = replay_journal(MemoryHold::new(hold()), &journal).unwrap();
    assert_eq!(result.final_turn, 2);
    assert_eq!(result.final_status, GameStatus::Active);
}
