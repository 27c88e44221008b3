//! Serializable room description as supplied by a level loader.
//! This module exists to keep the stored shape of a room apart from the live grid.
//! It does no validation; `Room::from_data` does that.

use serde::{Deserialize, Serialize};

use crate::monster::MonsterKind;
use crate::orientation::Orientation;
use crate::tiles::{ItemTile, OpaqueTile};
use crate::types::{LevelId, Pos, RoomCoords, RoomId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSpawn {
    pub kind: MonsterKind,
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
    /// Question a 'Neather asks the first time it sees the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbAction {
    Toggle,
    Open,
    Close,
}

/// One door affected by an orb. The whole connected door is changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbAgent {
    pub action: OrbAction,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbData {
    pub x: i32,
    pub y: i32,
    pub agents: Vec<OrbAgent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollData {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Inclusive rectangle of stairs squares leading to one level exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ExitRegion {
    pub fn contains(&self, pos: Pos) -> bool {
        (self.left..=self.right).contains(&pos.x) && (self.top..=self.bottom).contains(&pos.y)
    }
}

/// Two-layer tile data plus the room's monsters and fixtures, tiles stored row-major as ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomData {
    pub id: RoomId,
    pub level: LevelId,
    pub coords: RoomCoords,
    pub cols: usize,
    pub rows: usize,
    pub opaque: Vec<u8>,
    pub items: Vec<u8>,
    #[serde(default)]
    pub monsters: Vec<MonsterSpawn>,
    #[serde(default)]
    pub orbs: Vec<OrbData>,
    #[serde(default)]
    pub scrolls: Vec<ScrollData>,
    #[serde(default)]
    pub exits: Vec<ExitRegion>,
}

impl RoomData {
    /// An all-floor room with no items or monsters.
    pub fn open(id: RoomId, level: LevelId, coords: RoomCoords, cols: usize, rows: usize) -> Self {
        Self {
            id,
            level,
            coords,
            cols,
            rows,
            opaque: vec![OpaqueTile::Floor as u8; cols * rows],
            items: vec![ItemTile::Empty as u8; cols * rows],
            monsters: Vec::new(),
            orbs: Vec::new(),
            scrolls: Vec::new(),
            exits: Vec::new(),
        }
    }

    pub fn set_opaque(&mut self, x: i32, y: i32, tile: OpaqueTile) -> &mut Self {
        let i = self.index(x, y);
        self.opaque[i] = tile as u8;
        self
    }

    pub fn set_item(&mut self, x: i32, y: i32, tile: ItemTile) -> &mut Self {
        let i = self.index(x, y);
        self.items[i] = tile as u8;
        self
    }

    pub fn add_monster(
        &mut self,
        kind: MonsterKind,
        x: i32,
        y: i32,
        orientation: Orientation,
    ) -> &mut Self {
        self.monsters.push(MonsterSpawn { kind, x, y, orientation, question: None });
        self
    }

    pub fn add_scroll(&mut self, x: i32, y: i32, text: &str) -> &mut Self {
        self.set_item(x, y, ItemTile::Scroll);
        self.scrolls.push(ScrollData { x, y, text: text.to_string() });
        self
    }

    pub fn add_orb(&mut self, x: i32, y: i32, agents: Vec<OrbAgent>) -> &mut Self {
        self.set_item(x, y, ItemTile::Orb);
        self.orbs.push(OrbData { x, y, agents });
        self
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows,
            "({x},{y}) outside {}x{} room data",
            self.cols,
            self.rows
        );
        y as usize * self.cols + x as usize
    }
}
