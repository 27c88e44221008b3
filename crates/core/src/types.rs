use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use strum::FromRepr;

use crate::orientation::Orientation;

new_key_type! {
    pub struct MonsterId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, o: Orientation) -> Self {
        Self { y: self.y + o.dy(), x: self.x + o.dx() }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelId(pub u32);

/// Position of a room inside its level's room graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomCoords {
    pub x: i32,
    pub y: i32,
}

/// Player input for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr)]
#[repr(u8)]
pub enum Command {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    West = 3,
    Wait = 4,
    East = 5,
    SouthWest = 6,
    South = 7,
    SouthEast = 8,
    Clockwise = 9,
    CounterClockwise = 10,
    Restart = 11,
    Yes = 12,
    No = 13,
}

impl Command {
    /// Movement direction for the eight move commands.
    pub fn direction(self) -> Option<Orientation> {
        match self {
            Self::NorthWest => Some(Orientation::NW),
            Self::North => Some(Orientation::N),
            Self::NorthEast => Some(Orientation::NE),
            Self::West => Some(Orientation::W),
            Self::East => Some(Orientation::E),
            Self::SouthWest => Some(Orientation::SW),
            Self::South => Some(Orientation::S),
            Self::SouthEast => Some(Orientation::SE),
            _ => None,
        }
    }

    pub fn from_direction(o: Orientation) -> Self {
        match o {
            Orientation::NW => Self::NorthWest,
            Orientation::N => Self::North,
            Orientation::NE => Self::NorthEast,
            Orientation::W => Self::West,
            Orientation::None => Self::Wait,
            Orientation::E => Self::East,
            Orientation::SW => Self::SouthWest,
            Orientation::S => Self::South,
            Orientation::SE => Self::SouthEast,
        }
    }
}

/// Lifecycle of one room visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    /// The player was killed; only `Command::Restart` or a reload continues.
    Dying,
    /// The player left the room or level; the caller supplies what comes next.
    AwaitingTransition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementClass {
    Ground,
    Air,
}
