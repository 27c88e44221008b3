pub mod config;
pub mod cue;
pub mod error;
pub mod game;
pub mod hold;
pub mod journal;
pub mod journal_file;
pub mod monster;
pub mod mood;
pub mod orientation;
pub mod path_map;
pub mod persistence;
pub mod replay;
pub mod room;
pub mod room_data;
pub mod swordsman;
pub mod tiles;
pub mod types;

pub use config::EngineConfig;
pub use cue::{CueEvent, CueEvents, CueKind};
pub use error::{LoadError, PersistenceError, ReplayError};
pub use game::{CommandHistory, CurrentGame, PendingQuestion};
pub use hold::{HoldData, LevelSource, MemoryHold};
pub use journal::{CommandJournal, CommandRecord};
pub use orientation::Orientation;
pub use persistence::{NullPersistence, Persistence, RecordingPersistence, SavedGame};
pub use replay::*;
pub use room::Room;
pub use room_data::RoomData;
pub use types::*;
