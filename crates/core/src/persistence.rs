//! Persistence collaborator. The engine reports save points; where and how the state
//! is stored is up to the implementation. Failures are logged by the engine and
//! never stop a turn.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::swordsman::Swordsman;
use crate::types::{Command, LevelId, RoomId};

/// Enough to resume play: where the player is and how they got there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub level: LevelId,
    pub room: RoomId,
    pub player: Swordsman,
    pub turn_no: u32,
    /// Commands since the room was entered.
    pub commands: Vec<Command>,
    pub explored: BTreeSet<RoomId>,
    pub conquered: BTreeSet<RoomId>,
}

/// Commands played in one room visit, written when the player leaves it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSegment {
    pub level: LevelId,
    pub room: RoomId,
    pub first_turn: u32,
    pub last_turn: u32,
    pub description: String,
    pub commands: Vec<Command>,
}

pub trait Persistence {
    fn save_checkpoint(&mut self, state: &SavedGame) -> Result<(), PersistenceError>;
    fn save_room_begin(&mut self, state: &SavedGame) -> Result<(), PersistenceError>;
    fn save_level_begin(&mut self, state: &SavedGame) -> Result<(), PersistenceError>;
    fn write_demo_segment(&mut self, segment: &DemoSegment) -> Result<(), PersistenceError>;
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPersistence;

impl Persistence for NullPersistence {
    fn save_checkpoint(&mut self, _state: &SavedGame) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn save_room_begin(&mut self, _state: &SavedGame) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn save_level_begin(&mut self, _state: &SavedGame) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn write_demo_segment(&mut self, _segment: &DemoSegment) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Keeps every call in memory. Clones share the same log, so a test can hand one
/// to the engine and inspect another.
#[derive(Clone, Debug, Default)]
pub struct RecordingPersistence {
    log: Rc<RefCell<SaveLog>>,
    failing: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveLog {
    pub checkpoints: Vec<SavedGame>,
    pub room_begins: Vec<SavedGame>,
    pub level_begins: Vec<SavedGame>,
    pub demos: Vec<DemoSegment>,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nothing and fails every call.
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn log(&self) -> SaveLog {
        self.log.borrow().clone()
    }

    fn record(&self, f: impl FnOnce(&mut SaveLog)) -> Result<(), PersistenceError> {
        if self.failing {
            return Err(PersistenceError("recording persistence set to fail".to_string()));
        }
        f(&mut self.log.borrow_mut());
        Ok(())
    }
}

impl Persistence for RecordingPersistence {
    fn save_checkpoint(&mut self, state: &SavedGame) -> Result<(), PersistenceError> {
        self.record(|log| log.checkpoints.push(state.clone()))
    }

    fn save_room_begin(&mut self, state: &SavedGame) -> Result<(), PersistenceError> {
        self.record(|log| log.room_begins.push(state.clone()))
    }

    fn save_level_begin(&mut self, state: &SavedGame) -> Result<(), PersistenceError> {
        self.record(|log| log.level_begins.push(state.clone()))
    }

    fn write_demo_segment(&mut self, segment: &DemoSegment) -> Result<(), PersistenceError> {
        self.record(|log| log.demos.push(segment.clone()))
    }
}
