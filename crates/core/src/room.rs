//! The live room: two tile layers, the monster arena and the per-turn dirty state.
//! This module exists to keep every grid mutation behind one small set of calls.
//! It does not enforce game rules; callers check legality before plotting or moving.

use std::collections::BTreeMap;
use std::mem;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Layer, LoadError};
use crate::monster::{EyeSide, Monster, MonsterBody, MonsterKind};
use crate::path_map::PathMap;
use crate::room_data::{ExitRegion, OrbData, RoomData};
use crate::tiles::{ItemTile, MoveCaps, OpaqueTile, Tile, is_obstacle_for};
use crate::types::{LevelId, MonsterId, MovementClass, Pos, RoomCoords, RoomId};

#[derive(Clone, Debug)]
pub struct Room {
    pub id: RoomId,
    pub level: LevelId,
    pub coords: RoomCoords,
    cols: usize,
    rows: usize,
    opaque: Vec<OpaqueTile>,
    items: Vec<ItemTile>,
    monsters: SlotMap<MonsterId, Monster>,
    order: Vec<MonsterId>,
    dead: Vec<MonsterId>,
    occupancy: Vec<Option<MonsterId>>,
    orbs: Vec<OrbData>,
    scrolls: BTreeMap<Pos, String>,
    exits: Vec<ExitRegion>,
    next_seq: u32,
    plotted: bool,
    tar_growth_pending: bool,
    ground_paths: PathMap,
    air_paths: PathMap,
}

impl Room {
    pub fn from_data(data: &RoomData) -> Result<Self, LoadError> {
        let fits = i32::try_from(data.cols).is_ok() && i32::try_from(data.rows).is_ok();
        let area = data
            .cols
            .checked_mul(data.rows)
            .filter(|_| fits)
            .ok_or(LoadError::BadGeometry { cols: data.cols, rows: data.rows })?;
        if data.opaque.len() != area {
            return Err(LoadError::LayerSize {
                layer: Layer::Opaque,
                expected: area,
                found: data.opaque.len(),
            });
        }
        if data.items.len() != area {
            return Err(LoadError::LayerSize {
                layer: Layer::Item,
                expected: area,
                found: data.items.len(),
            });
        }

        let alloc_failed = || LoadError::Allocation { cols: data.cols, rows: data.rows };
        let mut opaque = Vec::new();
        opaque.try_reserve_exact(area).map_err(|_| alloc_failed())?;
        for (index, &id) in data.opaque.iter().enumerate() {
            let tile = OpaqueTile::from_repr(id)
                .ok_or(LoadError::InvalidTile { layer: Layer::Opaque, index, id })?;
            opaque.push(tile);
        }
        let mut items = Vec::new();
        items.try_reserve_exact(area).map_err(|_| alloc_failed())?;
        for (index, &id) in data.items.iter().enumerate() {
            let tile = ItemTile::from_repr(id)
                .ok_or(LoadError::InvalidTile { layer: Layer::Item, index, id })?;
            items.push(tile);
        }
        let mut occupancy = Vec::new();
        occupancy.try_reserve_exact(area).map_err(|_| alloc_failed())?;
        occupancy.resize(area, None);

        let ground_paths = PathMap::new(data.cols, data.rows).ok_or_else(alloc_failed)?;
        let air_paths = PathMap::new(data.cols, data.rows).ok_or_else(alloc_failed)?;

        let mut room = Self {
            id: data.id,
            level: data.level,
            coords: data.coords,
            cols: data.cols,
            rows: data.rows,
            opaque,
            items,
            monsters: SlotMap::with_key(),
            order: Vec::new(),
            dead: Vec::new(),
            occupancy,
            orbs: data.orbs.clone(),
            scrolls: data.scrolls.iter().map(|s| (Pos::new(s.x, s.y), s.text.clone())).collect(),
            exits: data.exits.clone(),
            next_seq: 0,
            plotted: false,
            tar_growth_pending: false,
            ground_paths,
            air_paths,
        };

        for spawn in &data.monsters {
            let pos = Pos::new(spawn.x, spawn.y);
            if !room.is_valid(pos) || room.monster_at(pos).is_some() {
                return Err(LoadError::BadMonsterPlacement { pos });
            }
            let body = MonsterBody::new(spawn.kind, spawn.question.clone());
            let mut monster = Monster::new(body, pos, spawn.orientation);
            monster.first_turn = false;
            room.add_monster(monster);
        }
        room.assign_tar_mother_eyes();

        debug!(room = ?room.id, monsters = room.order.len(), "room built from data");
        Ok(room)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn calc_area(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_valid(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    /// Panics when `pos` is outside the room.
    pub fn opaque(&self, pos: Pos) -> OpaqueTile {
        self.opaque[self.index(pos)]
    }

    /// Panics when `pos` is outside the room.
    pub fn item(&self, pos: Pos) -> ItemTile {
        self.items[self.index(pos)]
    }

    pub fn opaque_tiles(&self) -> &[OpaqueTile] {
        &self.opaque
    }

    pub fn item_tiles(&self) -> &[ItemTile] {
        &self.items
    }

    /// Whether either layer at `pos` blocks a mover with `caps`.
    pub fn tiles_block(&self, pos: Pos, caps: MoveCaps) -> bool {
        is_obstacle_for(Tile::Opaque(self.opaque(pos)), caps)
            || is_obstacle_for(Tile::Item(self.item(pos)), caps)
    }

    /// Changes one square. Serpent tiles must name the serpent that lays them.
    pub fn plot(&mut self, pos: Pos, tile: impl Into<Tile>, causing: Option<MonsterId>) {
        let i = self.index(pos);
        match tile.into() {
            Tile::Opaque(t) => self.opaque[i] = t,
            Tile::Item(t) => {
                if t.is_serpent() {
                    let serpent = causing.expect("serpent tiles are plotted by their serpent");
                    assert_eq!(
                        self.monsters.get(serpent).map(Monster::kind),
                        Some(MonsterKind::Serpent),
                        "serpent tiles are plotted by their serpent"
                    );
                }
                self.items[i] = t;
            }
        }
        self.plotted = true;
    }

    pub fn plotted_this_turn(&self) -> bool {
        self.plotted
    }

    pub fn clear_plot_flag(&mut self) {
        self.plotted = false;
    }

    pub fn request_tar_growth(&mut self) {
        self.tar_growth_pending = true;
    }

    pub fn take_tar_growth(&mut self) -> bool {
        mem::take(&mut self.tar_growth_pending)
    }

    /// Panics when `pos` is outside the room.
    pub fn monster_at(&self, pos: Pos) -> Option<MonsterId> {
        self.occupancy[self.index(pos)]
    }

    /// Live or just-killed monster. Killed records stay until the next `purge_dead`.
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(id)
    }

    /// Live monsters in process order.
    pub fn order(&self) -> &[MonsterId] {
        &self.order
    }

    pub fn live_monsters(&self) -> impl Iterator<Item = (MonsterId, &Monster)> {
        self.order.iter().map(|&id| (id, &self.monsters[id]))
    }

    pub fn has_live(&self, kind: MonsterKind) -> bool {
        self.live_monsters().any(|(_, m)| m.kind() == kind)
    }

    /// Monsters that must die before the room counts as conquered.
    pub fn conquest_monster_count(&self) -> usize {
        self.live_monsters().filter(|(_, m)| m.counts_for_conquest()).count()
    }

    /// Appends to the process order. Panics if the square already holds a monster.
    pub fn add_monster(&mut self, mut monster: Monster) -> MonsterId {
        let pos = monster.pos;
        assert!(self.monster_at(pos).is_none(), "square {pos:?} already holds a monster");
        monster.process_seq = self.next_seq;
        self.next_seq += 1;
        let id = self.monsters.insert(monster);
        let i = self.index(pos);
        self.occupancy[i] = Some(id);
        self.order.push(id);
        id
    }

    /// Removes a monster from the order and occupancy but keeps its record until `purge_dead`.
    pub fn remove_monster(&mut self, id: MonsterId) {
        let Some(monster) = self.monsters.get_mut(id) else {
            return;
        };
        if !monster.alive {
            return;
        }
        monster.alive = false;
        let pos = monster.pos;
        let i = self.index(pos);
        if self.occupancy[i] == Some(id) {
            self.occupancy[i] = None;
        }
        self.order.retain(|&other| other != id);
        self.dead.push(id);
    }

    /// Moves the head position; process order is unaffected.
    pub fn move_monster(&mut self, id: MonsterId, to: Pos) {
        let from = self.monsters[id].pos;
        if from == to {
            return;
        }
        assert!(
            self.monster_at(to).is_none_or(|other| other == id),
            "square {to:?} already holds a monster"
        );
        let from_i = self.index(from);
        let to_i = self.index(to);
        self.occupancy[from_i] = None;
        self.occupancy[to_i] = Some(id);
        let monster = &mut self.monsters[id];
        monster.prev_pos = from;
        monster.pos = to;
    }

    /// Swaps a monster's record for a new one in the same order slot and square.
    pub fn replace_monster(&mut self, id: MonsterId, mut replacement: Monster) -> MonsterId {
        let slot = self.order.iter().position(|&other| other == id);
        let pos = self.monsters[id].pos;
        replacement.pos = pos;
        replacement.prev_pos = pos;
        self.remove_monster(id);
        let new_id = self.add_monster(replacement);
        if let Some(slot) = slot {
            self.order.pop();
            self.order.insert(slot, new_id);
        }
        new_id
    }

    /// Frees records of monsters that died last turn.
    pub fn purge_dead(&mut self) {
        for id in self.dead.drain(..) {
            self.monsters.remove(id);
        }
    }

    pub fn clear_first_turn_flags(&mut self) {
        for &id in &self.order {
            self.monsters[id].first_turn = false;
        }
    }

    pub fn orb_at(&self, pos: Pos) -> Option<&OrbData> {
        self.orbs.iter().find(|orb| Pos::new(orb.x, orb.y) == pos)
    }

    pub fn scroll_text(&self, pos: Pos) -> Option<&str> {
        self.scrolls.get(&pos).map(String::as_str)
    }

    /// Index of the exit region containing `pos`, if any.
    pub fn exit_region_at(&self, pos: Pos) -> Option<usize> {
        self.exits.iter().position(|region| region.contains(pos))
    }

    pub fn path_map(&self, class: MovementClass) -> &PathMap {
        match class {
            MovementClass::Ground => &self.ground_paths,
            MovementClass::Air => &self.air_paths,
        }
    }

    /// Rebuilds both path maps toward `target`. Monsters and swords are not obstacles.
    pub fn recompute_path_maps(&mut self, target: Pos) {
        let mut ground = mem::replace(&mut self.ground_paths, PathMap::empty());
        let mut air = mem::replace(&mut self.air_paths, PathMap::empty());
        ground.compute(target, |p| self.tiles_block_for_paths(p, MoveCaps::empty()));
        air.compute(target, |p| self.tiles_block_for_paths(p, MoveCaps::FLIES));
        self.ground_paths = ground;
        self.air_paths = air;
    }

    fn tiles_block_for_paths(&self, pos: Pos, caps: MoveCaps) -> bool {
        let item = self.item(pos);
        // Serpent bodies shift every turn; paths go through them like through monsters.
        let item_blocks = !item.is_serpent() && is_obstacle_for(Tile::Item(item), caps);
        is_obstacle_for(Tile::Opaque(self.opaque(pos)), caps) || item_blocks
    }

    pub fn tar_count(&self) -> usize {
        self.items.iter().filter(|&&t| t == ItemTile::Tar).count()
    }

    pub fn is_tar(&self, pos: Pos) -> bool {
        self.is_valid(pos) && self.item(pos) == ItemTile::Tar
    }

    /// Every square whose opaque tile is `tile`, row-major.
    pub fn squares_with(&self, tile: OpaqueTile) -> Vec<Pos> {
        self.positions().filter(|&p| self.opaque(p) == tile).collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        (0..rows).flat_map(move |y| (0..cols).map(move |x| Pos::new(x, y)))
    }

    fn assign_tar_mother_eyes(&mut self) {
        let mothers: Vec<(MonsterId, Pos)> = self
            .live_monsters()
            .filter(|(_, m)| m.kind() == MonsterKind::TarMother)
            .map(|(id, m)| (id, m.pos))
            .collect();
        for (id, pos) in mothers {
            let west = pos.offset(-1, 0);
            let west_is_mother = self.is_valid(west)
                && self
                    .monster_at(west)
                    .is_some_and(|other| self.monsters[other].kind() == MonsterKind::TarMother);
            if let MonsterBody::TarMother { eye, .. } = &mut self.monsters[id].body {
                *eye = if west_is_mother { EyeSide::Right } else { EyeSide::Left };
            }
        }
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(self.is_valid(pos), "{pos:?} is outside the {}x{} room", self.cols, self.rows);
        pos.y as usize * self.cols + pos.x as usize
    }
}
