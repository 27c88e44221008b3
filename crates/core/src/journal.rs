use serde::{Deserialize, Serialize};

use crate::types::{Command, LevelId};

/// A recorded play session: the hold it ran against, where it started and every
/// command in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandJournal {
    pub format_version: u16,
    pub build_id: String,
    pub hold_hash: u64,
    pub level: LevelId,
    pub records: Vec<CommandRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub seq: u64,
    /// Turn number the command was issued on, before it was processed.
    pub turn: u32,
    pub command: Command,
}

impl CommandJournal {
    pub fn new(level: LevelId, hold_hash: u64) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            hold_hash,
            level,
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, turn: u32, command: Command) {
        let seq = self.records.len() as u64;
        self.records.push(CommandRecord { seq, turn, command });
    }

    pub fn commands(&self) -> Vec<Command> {
        self.records.iter().map(|record| record.command).collect()
    }
}
