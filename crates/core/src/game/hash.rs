//! Snapshot hashing for replay verification.
//! This module exists to keep hashing concerns separate from turn processing.
//! It does not decide what a replay is compared against.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl CurrentGame {
    /// Coarse summary for spot checks: player square and facing, monster count,
    /// turn number and the explored/conquered room counts.
    pub fn checksum(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_i32(self.player.pos.x);
        hasher.write_i32(self.player.pos.y);
        hasher.write_u8(self.player.orientation as u8);
        hasher.write_usize(self.room.order().len());
        hasher.write_u32(self.turn_no);
        hasher.write_usize(self.conquered.len());
        hasher.write_usize(self.explored.len());
        hasher.finish()
    }

    /// Every tile, every live monster in process order and the full player state.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.room.id.0);
        hasher.write_u32(self.turn_no);
        for &tile in self.room.opaque_tiles() {
            hasher.write_u8(tile as u8);
        }
        for &tile in self.room.item_tiles() {
            hasher.write_u8(tile as u8);
        }
        for (_, monster) in self.room.live_monsters() {
            hasher.write_u8(monster.kind() as u8);
            hasher.write_i32(monster.pos.x);
            hasher.write_i32(monster.pos.y);
            hasher.write_u8(monster.orientation as u8);
            hasher.write_u32(monster.process_seq);
        }
        let player = &self.player;
        hasher.write_i32(player.pos.x);
        hasher.write_i32(player.pos.y);
        hasher.write_u8(player.orientation as u8);
        hasher.write_u8(u8::from(player.visible));
        hasher.write_u8(u8::from(player.placing_mimic));
        hasher.write_u8(u8::from(player.dying));
        hasher.write_u8(self.status as u8);
        hasher.finish()
    }
}
