use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use super::*;

/// Writes a journal holding `commands`, one per turn, and returns its path.
fn journal_with(dir: &TempDir, name: &str, commands: &[Command]) -> PathBuf {
    let path = dir.path().join(name);
    let mut writer = JournalWriter::create(&path, LevelId(1), "dev", 0).unwrap();
    for (turn, &command) in commands.iter().enumerate() {
        writer.append(turn as u32, command).unwrap();
    }
    path
}

fn lines_of(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}

fn rewrite(path: &Path, lines: &[String]) {
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

#[test]
fn header_and_records_read_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/session.jsonl");

    let mut writer = JournalWriter::create(&path, LevelId(3), "test-build", 99).unwrap();
    writer.append(0, Command::North).unwrap();
    writer.append(1, Command::Clockwise).unwrap();
    writer.append(1, Command::Restart).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    let journal = &loaded.journal;
    assert_eq!(journal.format_version, FORMAT_VERSION);
    assert_eq!((journal.build_id.as_str(), journal.hold_hash), ("test-build", 99));
    assert_eq!(journal.level, LevelId(3));
    assert_eq!(journal.commands(), vec![Command::North, Command::Clockwise, Command::Restart]);
    assert_eq!(journal.records[2], CommandRecord { seq: 2, turn: 1, command: Command::Restart });
    assert_eq!(loaded.next_seq, 3);
    assert_ne!(loaded.last_sha256_hex, GENESIS_HASH);
}

#[test]
fn edited_command_breaks_the_chain_on_its_line() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "edited.jsonl", &[Command::East, Command::Wait]);

    let mut lines = lines_of(&path);
    lines[2] = lines[2].replace("Wait", "West");
    rewrite(&path, &lines);

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::HashChainBroken { line: 3 })),
        "got: {result:?}"
    );
}

#[test]
fn dropped_record_is_caught_by_its_sequence_number() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "dropped.jsonl", &[Command::North, Command::South, Command::East]);

    let mut lines = lines_of(&path);
    lines.remove(2);
    rewrite(&path, &lines);

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::InvalidRecord { line: 3, .. })),
        "got: {result:?}"
    );
}

#[test]
fn swapped_records_with_patched_seq_still_fail() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "swapped.jsonl", &[Command::North, Command::South]);

    let mut lines = lines_of(&path);
    lines.swap(1, 2);
    lines[1] = lines[1].replacen("\"seq\":1", "\"seq\":0", 1);
    rewrite(&path, &lines);

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::HashChainBroken { line: 2 })),
        "got: {result:?}"
    );
}

#[test]
fn cut_off_line_is_incomplete() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "cut.jsonl", &[Command::North]);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"seq\":1,\"tu").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::IncompleteLine { line: 3 })),
        "got: {result:?}"
    );
}

#[test]
fn empty_and_garbage_files_are_rejected() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.jsonl");
    fs::write(&empty, "").unwrap();
    assert!(matches!(load_journal_from_file(&empty), Err(JournalLoadError::EmptyFile)));

    let garbage = dir.path().join("garbage.jsonl");
    fs::write(&garbage, "not valid json\n").unwrap();
    assert!(matches!(
        load_journal_from_file(&garbage),
        Err(JournalLoadError::InvalidHeader { line: 1, .. })
    ));
}

#[test]
fn blank_record_line_is_invalid() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "blank.jsonl", &[Command::Wait]);

    let mut lines = lines_of(&path);
    lines.insert(1, String::new());
    rewrite(&path, &lines);

    assert!(matches!(
        load_journal_from_file(&path),
        Err(JournalLoadError::InvalidRecord { line: 2, .. })
    ));
}

#[test]
fn header_only_file_is_an_empty_journal() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "header.jsonl", &[]);

    let loaded = load_journal_from_file(&path).unwrap();
    assert!(loaded.journal.records.is_empty());
    assert_eq!(loaded.next_seq, 0);
    assert_eq!(loaded.last_sha256_hex, GENESIS_HASH);
}

#[test]
fn resumed_writer_extends_the_same_chain() {
    let dir = tempdir().unwrap();
    let path = journal_with(&dir, "resume.jsonl", &[Command::West]);

    let loaded = load_journal_from_file(&path).unwrap();
    let mut writer = JournalWriter::resume(&path, loaded.last_sha256_hex, loaded.next_seq).unwrap();
    writer.append(1, Command::Yes).unwrap();
    drop(writer);

    let reloaded = load_journal_from_file(&path).unwrap();
    assert_eq!(reloaded.journal.commands(), vec![Command::West, Command::Yes]);
    assert_eq!(reloaded.next_seq, 2);
}
