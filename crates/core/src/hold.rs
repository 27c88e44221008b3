//! Level source collaborator and the in-memory hold that implements it.
//! The engine asks for rooms by id or by neighbourhood and for where levels start
//! and lead; it never sees how a hold is stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::LoadError;
use crate::orientation::Orientation;
use crate::room_data::RoomData;
use crate::types::{LevelId, RoomCoords, RoomId};

/// Where the player appears when a level starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub room: RoomId,
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
}

/// One stairs region of a room and the level it leads to. `None` ends the hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelExit {
    pub room: RoomId,
    pub region: usize,
    pub target: Option<LevelId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: LevelId,
    pub entrance: Entrance,
    #[serde(default)]
    pub exits: Vec<LevelExit>,
}

/// A whole hold as stored in a hold file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldData {
    pub name: String,
    pub levels: Vec<LevelData>,
    pub rooms: Vec<RoomData>,
}

pub trait LevelSource {
    fn load_room(&self, id: RoomId) -> Result<RoomData, LoadError>;
    /// The room next to `coords` in `direction`, if the level has one there.
    fn adjacent_room(
        &self,
        level: LevelId,
        coords: RoomCoords,
        direction: Orientation,
    ) -> Option<RoomData>;
    /// Level reached through exit `region` of `room`. `None` when the exit ends the hold.
    fn level_exit_target(&self, level: LevelId, room: RoomId, region: usize) -> Option<LevelId>;
    fn level_entrance(&self, level: LevelId) -> Result<Entrance, LoadError>;
}

pub struct MemoryHold {
    data: HoldData,
    rooms: BTreeMap<RoomId, usize>,
    by_coords: BTreeMap<(LevelId, RoomCoords), RoomId>,
}

impl MemoryHold {
    pub fn new(data: HoldData) -> Self {
        let rooms = data.rooms.iter().enumerate().map(|(i, room)| (room.id, i)).collect();
        let by_coords =
            data.rooms.iter().map(|room| ((room.level, room.coords), room.id)).collect();
        debug!(hold = %data.name, levels = data.levels.len(), rooms = data.rooms.len(), "hold indexed");
        Self { data, rooms, by_coords }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn data(&self) -> &HoldData {
        &self.data
    }

    /// Hash of the hold's canonical JSON, recorded in journals to catch replays
    /// against a different hold.
    pub fn content_hash(&self) -> u64 {
        let bytes = serde_json::to_vec(&self.data).unwrap_or_default();
        xxh3_64(&bytes)
    }

    /// First level in file order.
    pub fn first_level(&self) -> Option<LevelId> {
        self.data.levels.first().map(|level| level.id)
    }

    fn level(&self, id: LevelId) -> Option<&LevelData> {
        self.data.levels.iter().find(|level| level.id == id)
    }
}

impl LevelSource for MemoryHold {
    fn load_room(&self, id: RoomId) -> Result<RoomData, LoadError> {
        self.rooms
            .get(&id)
            .map(|&i| self.data.rooms[i].clone())
            .ok_or(LoadError::UnknownRoom(id))
    }

    fn adjacent_room(
        &self,
        level: LevelId,
        coords: RoomCoords,
        direction: Orientation,
    ) -> Option<RoomData> {
        let next = RoomCoords { x: coords.x + direction.dx(), y: coords.y + direction.dy() };
        let id = self.by_coords.get(&(level, next))?;
        self.load_room(*id).ok()
    }

    fn level_exit_target(&self, level: LevelId, room: RoomId, region: usize) -> Option<LevelId> {
        self.level(level)?
            .exits
            .iter()
            .find(|exit| exit.room == room && exit.region == region)
            .and_then(|exit| exit.target)
    }

    fn level_entrance(&self, level: LevelId) -> Result<Entrance, LoadError> {
        self.level(level).map(|l| l.entrance).ok_or(LoadError::UnknownLevel(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_hold() -> HoldData {
        let west = RoomData::open(RoomId(1), LevelId(1), RoomCoords { x: 0, y: 0 }, 4, 4);
        let east = RoomData::open(RoomId(2), LevelId(1), RoomCoords { x: 1, y: 0 }, 4, 4);
        HoldData {
            name: "test".into(),
            levels: vec![LevelData {
                id: LevelId(1),
                entrance: Entrance { room: RoomId(1), x: 1, y: 1, orientation: Orientation::S },
                exits: vec![LevelExit { room: RoomId(2), region: 0, target: Some(LevelId(2)) }],
            }],
            rooms: vec![west, east],
        }
    }

    #[test]
    fn neighbours_are_found_by_coordinates() {
        let hold = MemoryHold::new(two_room_hold());
        let east = hold.adjacent_room(LevelId(1), RoomCoords { x: 0, y: 0 }, Orientation::E);
        assert_eq!(east.map(|r| r.id), Some(RoomId(2)));
        assert!(hold.adjacent_room(LevelId(1), RoomCoords { x: 0, y: 0 }, Orientation::N).is_none());
    }

    #[test]
    fn unknown_ids_are_load_errors() {
        let hold = MemoryHold::new(two_room_hold());
        assert_eq!(hold.load_room(RoomId(9)).err(), Some(LoadError::UnknownRoom(RoomId(9))));
        assert_eq!(hold.level_entrance(LevelId(7)).err(), Some(LoadError::UnknownLevel(LevelId(7))));
    }

    #[test]
    fn exits_resolve_per_room_and_region() {
        let hold = MemoryHold::new(two_room_hold());
        assert_eq!(hold.level_exit_target(LevelId(1), RoomId(2), 0), Some(LevelId(2)));
        assert_eq!(hold.level_exit_target(LevelId(1), RoomId(2), 1), None);
    }

    #[test]
    fn hold_files_round_trip_through_json() {
        let data = two_room_hold();
        let text = serde_json::to_string(&data).expect("serialize");
        let hold = MemoryHold::from_json(&text).expect("parse");
        assert_eq!(hold.data(), &data);
        assert_eq!(hold.content_hash(), MemoryHold::new(data).content_hash());
    }
}
