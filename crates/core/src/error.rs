//! Recoverable error types. Contract violations panic instead and never show up here.

use thiserror::Error;

use crate::types::{GameStatus, LevelId, Pos, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Opaque,
    Item,
}

/// Why a room or level could not be loaded. The previous state is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("room {0:?} is not part of this hold")]
    UnknownRoom(RoomId),
    #[error("level {0:?} is not part of this hold")]
    UnknownLevel(LevelId),
    #[error("{layer:?} layer has {found} tiles, expected {expected}")]
    LayerSize { layer: Layer, expected: usize, found: usize },
    #[error("{layer:?} tile id {id} at index {index} is outside the tile enumeration")]
    InvalidTile { layer: Layer, index: usize, id: u8 },
    #[error("monster at {pos:?} is outside the room or on an occupied square")]
    BadMonsterPlacement { pos: Pos },
    #[error("entrance {pos:?} is not a valid square")]
    BadEntrance { pos: Pos },
    #[error("room size {cols}x{rows} does not fit on a grid")]
    BadGeometry { cols: usize, rows: usize },
    #[error("could not allocate room buffers for {cols}x{rows}")]
    Allocation { cols: usize, rows: usize },
}

/// Why a recorded command sequence could not be played back.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("playback stopped in state {status:?} before command {index} of {total}")]
    UnexpectedStop { index: usize, total: usize, status: GameStatus },
    #[error("journal was recorded against hold {expected:#018x}, this hold is {found:#018x}")]
    HoldMismatch { expected: u64, found: u64 },
    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("persistence failed: {0}")]
pub struct PersistenceError(pub String);
