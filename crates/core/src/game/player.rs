use super::*;
use crate::cue::PotionKind;
use crate::room_data::OrbAction;
use crate::tiles::{Tile, blocks_arrow_movement, is_player_obstacle};

impl CurrentGame {
    /// Rotation, a step, or nothing. Only a swordsman that actually turned or moved
    /// reports an action for mimics to copy.
    pub(super) fn process_player_move(&mut self, command: Command) -> PlayerAction {
        match command {
            Command::Clockwise | Command::CounterClockwise => {
                let clockwise = command == Command::Clockwise;
                self.player.orientation = if clockwise {
                    self.player.orientation.rotate_cw()
                } else {
                    self.player.orientation.rotate_ccw()
                };
                self.stab(self.player.sword_pos());
                PlayerAction::Rotated { clockwise }
            }
            _ => match command.direction() {
                Some(o) => self.move_player(o),
                None => PlayerAction::None,
            },
        }
    }

    fn move_player(&mut self, o: Orientation) -> PlayerAction {
        let from = self.player.pos;
        let to = from.step(o);
        if blocks_arrow_movement(self.room.item(from), o) {
            self.cues.add(CueEvent::HitObstacle { pos: from });
            return PlayerAction::None;
        }
        if !self.room.is_valid(to) {
            self.try_exit_room(o);
            return PlayerAction::None;
        }
        if blocks_arrow_movement(self.room.item(to), o)
            || self.room.monster_at(to).is_some()
            || self.mimic_sword_at(to)
        {
            self.cues.add(CueEvent::HitObstacle { pos: to });
            return PlayerAction::None;
        }
        if self.room.opaque(to) == OpaqueTile::Pit {
            self.cues.add(CueEvent::Scared { pos: to });
            return PlayerAction::None;
        }
        if is_player_obstacle(Tile::Opaque(self.room.opaque(to)))
            || is_player_obstacle(Tile::Item(self.room.item(to)))
        {
            self.cues.add(CueEvent::HitObstacle { pos: to });
            return PlayerAction::None;
        }

        self.player.pos = to;
        if self.room.opaque(from) == OpaqueTile::Trapdoor {
            self.room.plot(from, OpaqueTile::Pit, None);
            self.cues.add(CueEvent::TrapdoorFell { pos: from });
        }
        self.stab(self.player.sword_pos());
        self.pick_up(to);
        if self.room.opaque(to) == OpaqueTile::Stairs {
            self.take_stairs(to);
        }
        PlayerAction::Moved(o)
    }

    fn mimic_sword_at(&self, pos: Pos) -> bool {
        self.room.live_monsters().any(|(_, m)| m.sword_pos() == Some(pos))
    }

    fn pick_up(&mut self, pos: Pos) {
        match self.room.item(pos) {
            ItemTile::Scroll => {
                let text = self.room.scroll_text(pos).unwrap_or_default().to_string();
                self.cues.add(CueEvent::SteppedOnScroll { pos, text });
            }
            ItemTile::PotionMimic => {
                self.room.plot(pos, ItemTile::Empty, None);
                self.cues.add(CueEvent::DrankPotion { pos, potion: PotionKind::Mimic });
                self.player.placing_mimic = true;
                self.player.cursor = pos;
                self.cues.add(CueEvent::MimicPlacementStarted);
            }
            ItemTile::PotionInvisibility => {
                self.room.plot(pos, ItemTile::Empty, None);
                self.cues.add(CueEvent::DrankPotion { pos, potion: PotionKind::Invisibility });
                self.player.visible = !self.player.visible;
                self.cues.add(CueEvent::InvisibilityToggled { visible: self.player.visible });
            }
            _ => {}
        }
    }

    /// Cursor moves with the direction commands; `Wait` drops the mimic under it.
    pub(super) fn process_mimic_placement(&mut self, command: Command) {
        if let Some(o) = command.direction() {
            let next = self.player.cursor.step(o);
            if self.room.is_valid(next) {
                self.player.cursor = next;
            }
            return;
        }
        if command != Command::Wait {
            return;
        }
        let pos = self.player.cursor;
        if !self.can_place_mimic(pos) {
            self.cues.add(CueEvent::HitObstacle { pos });
            return;
        }
        let mut mimic = Monster::new(MonsterBody::Mimic, pos, self.player.orientation);
        mimic.first_turn = false;
        let id = self.room.add_monster(mimic);
        self.player.placing_mimic = false;
        self.cues.add(CueEvent::MimicPlaced { pos });
        debug!(monster = ?id, ?pos, "mimic placed");
    }

    fn can_place_mimic(&self, pos: Pos) -> bool {
        let mimic_caps = Monster::new(MonsterBody::Mimic, pos, Orientation::N).caps();
        pos != self.player.pos
            && pos != self.player.sword_pos()
            && self.room.monster_at(pos).is_none()
            && !self.mimic_sword_at(pos)
            && !self.room.tiles_block(pos, mimic_caps)
    }

    /// Resolves one sword landing on `pos`. Tar is only queued here.
    pub(super) fn stab(&mut self, pos: Pos) {
        if !self.room.is_valid(pos) {
            return;
        }
        let on_tar = self.room.item(pos) == ItemTile::Tar;
        if let Some(id) = self.room.monster_at(pos) {
            let monster = self.room.monster(id).expect("occupant exists");
            // Mothers go with the tar under them.
            let shielded = monster.is_stab_immune() || (on_tar && monster.kind() == MonsterKind::TarMother);
            if !shielded {
                self.kill_monster(id);
            }
        }
        match self.room.item(pos) {
            ItemTile::Tar => {
                if !self.stabs.contains(&pos) {
                    self.stabs.push(pos);
                }
            }
            ItemTile::Orb => self.activate_orb(pos),
            _ => {}
        }
        if self.room.opaque(pos) == OpaqueTile::CrumblyWall {
            self.room.plot(pos, OpaqueTile::Floor, None);
            self.cues.add(CueEvent::CrumblyWallDestroyed { pos });
        }
    }

    pub(super) fn kill_monster(&mut self, id: MonsterId) {
        let Some(monster) = self.room.monster(id).filter(|m| m.alive) else {
            return;
        };
        let pos = monster.pos;
        self.room.remove_monster(id);
        self.mood.record_kill(self.turn_no);
        self.cues.add(CueEvent::MonsterDied { monster: id, pos });
    }

    fn activate_orb(&mut self, pos: Pos) {
        self.cues.add(CueEvent::OrbActivated { pos });
        let agents = self.room.orb_at(pos).map(|orb| orb.agents.clone()).unwrap_or_default();
        for agent in agents {
            let start = Pos::new(agent.x, agent.y);
            if !self.room.is_valid(start) {
                continue;
            }
            let current = self.room.opaque(start);
            let target = match (agent.action, current) {
                (OrbAction::Toggle | OrbAction::Open, OpaqueTile::DoorYellow) => OpaqueTile::DoorYellowOpen,
                (OrbAction::Toggle | OrbAction::Close, OpaqueTile::DoorYellowOpen) => OpaqueTile::DoorYellow,
                _ => continue,
            };
            for door in self.connected_squares(start, current) {
                let occupied = door == self.player.pos || self.room.monster_at(door).is_some();
                if target == OpaqueTile::DoorYellow && occupied {
                    continue;
                }
                self.room.plot(door, target, None);
            }
        }
    }

    /// 4-connected squares sharing `tile` with `start`, in visit order.
    fn connected_squares(&self, start: Pos, tile: OpaqueTile) -> Vec<Pos> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut found = Vec::new();
        while let Some(pos) = queue.pop_front() {
            found.push(pos);
            for o in Orientation::CARDINAL {
                let next = pos.step(o);
                if self.room.is_valid(next) && self.room.opaque(next) == tile && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        found
    }
}
