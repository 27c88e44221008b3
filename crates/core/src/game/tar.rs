//! Tar hit resolution and growth.
//! Every sword that lands on tar during a turn is queued; the batch is resolved in one
//! go after the monsters move so the result does not depend on which sword hit first.

use super::*;

impl CurrentGame {
    pub(super) fn resolve_simultaneous_stabs(&mut self) {
        let stabs = mem::take(&mut self.stabs);
        if stabs.is_empty() {
            return;
        }
        let had_tar = self.room.tar_count() > 0;

        // Decided for the whole batch before anything is removed.
        let vulnerable: Vec<Pos> = stabs
            .into_iter()
            .filter(|&pos| self.room.is_tar(pos) && self.tar_is_vulnerable(pos))
            .collect();
        let mut frontier = BTreeSet::new();
        for &pos in &vulnerable {
            self.remove_tar(pos);
            self.cues.add(CueEvent::TarDestroyed { pos });
            frontier.extend(Orientation::COMPASS.iter().map(|&o| pos.step(o)));
        }

        // Tar left outside every 2x2 block turns into babies, which can strand more tar.
        loop {
            let loose: Vec<Pos> = frontier
                .iter()
                .copied()
                .filter(|&pos| self.room.is_tar(pos) && !self.in_tar_block(pos))
                .collect();
            if loose.is_empty() {
                break;
            }
            frontier.clear();
            for pos in loose {
                self.remove_tar(pos);
                self.spawn_tar_baby(pos);
                frontier.extend(Orientation::COMPASS.iter().map(|&o| pos.step(o)));
            }
        }

        if had_tar && self.room.tar_count() == 0 {
            self.open_doors(OpaqueTile::DoorRed, CueEvent::RedDoorsOpened);
        }
    }

    /// Tar on the edge of its blob: some neighbour is not tar.
    fn tar_is_vulnerable(&self, pos: Pos) -> bool {
        Orientation::COMPASS.iter().any(|&o| !self.room.is_tar(pos.step(o)))
    }

    /// Whether `pos` is part of at least one solid 2x2 square of tar.
    fn in_tar_block(&self, pos: Pos) -> bool {
        [(-1, -1), (0, -1), (-1, 0), (0, 0)].into_iter().any(|(dx, dy)| {
            let corner = pos.offset(dx, dy);
            [(0, 0), (1, 0), (0, 1), (1, 1)]
                .into_iter()
                .all(|(cx, cy)| self.room.is_tar(corner.offset(cx, cy)))
        })
    }

    /// Clears the tar and kills a mother riding on it.
    fn remove_tar(&mut self, pos: Pos) {
        self.room.plot(pos, ItemTile::Empty, None);
        let mother = self
            .room
            .monster_at(pos)
            .filter(|&id| self.room.monster(id).is_some_and(|m| m.kind() == MonsterKind::TarMother));
        if let Some(id) = mother {
            self.kill_monster(id);
        }
    }

    fn spawn_tar_baby(&mut self, pos: Pos) {
        if self.room.monster_at(pos).is_some() || pos == self.player.pos {
            return;
        }
        let id = self.room.add_monster(Monster::new(MonsterBody::TarBaby, pos, Orientation::S));
        self.cues.add(CueEvent::TarBabyFormed { pos });
        debug!(monster = ?id, ?pos, "tar baby formed");
    }

    /// Spreads tar onto every empty, unoccupied floor square orthogonally next to tar.
    pub(super) fn grow_tar_if_flagged(&mut self) {
        if !self.room.take_tar_growth() {
            return;
        }
        let targets: BTreeSet<Pos> = self
            .room
            .positions()
            .filter(|&pos| self.room.is_tar(pos))
            .flat_map(|pos| Orientation::CARDINAL.map(|o| pos.step(o)))
            .filter(|&pos| self.can_grow_into(pos))
            .collect();
        for pos in targets {
            self.room.plot(pos, ItemTile::Tar, None);
        }
    }

    fn can_grow_into(&self, pos: Pos) -> bool {
        self.room.is_valid(pos)
            && self.room.opaque(pos) == OpaqueTile::Floor
            && self.room.item(pos) == ItemTile::Empty
            && self.room.monster_at(pos).is_none()
            && pos != self.player.pos
    }
}
