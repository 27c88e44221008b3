use super::*;
use crate::persistence::DemoSegment;
use crate::tiles::{Tile, is_player_obstacle};

impl CurrentGame {
    /// The player stepped off the grid in direction `o`.
    pub(super) fn try_exit_room(&mut self, o: Orientation) {
        let from = self.player.pos;
        let to = from.step(o);
        let (cols, rows) = (self.room.cols() as i32, self.room.rows() as i32);
        let off_x = to.x < 0 || to.x >= cols;
        let off_y = to.y < 0 || to.y >= rows;
        // A corner diagonal would leave through two edges at once.
        if off_x && off_y {
            self.cues.add(CueEvent::HitObstacle { pos: from });
            return;
        }
        let direction = match (to.x < 0, to.x >= cols, to.y < 0) {
            (true, _, _) => Orientation::W,
            (_, true, _) => Orientation::E,
            (_, _, true) => Orientation::N,
            _ => Orientation::S,
        };

        let Some(room) = self.adjacent_room(direction) else {
            self.cues.add(CueEvent::HitObstacle { pos: from });
            return;
        };
        let entry = match direction {
            Orientation::W => Pos::new(room.cols() as i32 - 1, to.y),
            Orientation::E => Pos::new(0, to.y),
            Orientation::N => Pos::new(to.x, room.rows() as i32 - 1),
            _ => Pos::new(to.x, 0),
        };
        if !self.can_enter(&room, entry) {
            self.cues.add(CueEvent::HitObstacle { pos: from });
            return;
        }

        self.leave_room(&format!("exited {direction:?}"));
        let next = room.id;
        if self.history.is_frozen() {
            self.cues.add(CueEvent::ExitRoomPending { direction, room: next });
            self.status = GameStatus::AwaitingTransition;
            self.pending_exit = Some(PendingExit::Room { room: Box::new(room), entry });
            debug!(from = ?self.room.id, to = ?next, "room exit pending");
            return;
        }
        self.cues.add(CueEvent::ExitRoom { direction, room: next });
        let orientation = self.player.orientation;
        self.enter_room(room, Swordsman::new(entry, orientation));
    }

    fn adjacent_room(&self, direction: Orientation) -> Option<Room> {
        let data = self.source.adjacent_room(self.level, self.room.coords, direction)?;
        match Room::from_data(&data) {
            Ok(room) => Some(room),
            Err(err) => {
                warn!(%err, room = ?data.id, "adjacent room failed to load");
                None
            }
        }
    }

    /// Whether the swordsman could stand on `entry` in `room`. Monsters only count
    /// while that room is still unconquered.
    fn can_enter(&self, room: &Room, entry: Pos) -> bool {
        if !room.is_valid(entry) {
            return false;
        }
        let opaque = room.opaque(entry);
        if opaque == OpaqueTile::Pit
            || is_player_obstacle(Tile::Opaque(opaque))
            || is_player_obstacle(Tile::Item(room.item(entry)))
        {
            return false;
        }
        let occupant = room.monster_at(entry).and_then(|id| room.monster(id));
        match occupant {
            Some(monster) => self.conquered.contains(&room.id) && monster.counts_for_conquest(),
            None => true,
        }
    }

    /// The player reached stairs at `pos`.
    pub(super) fn take_stairs(&mut self, pos: Pos) {
        let Some(region) = self.room.exit_region_at(pos) else {
            return;
        };
        self.leave_room("took the stairs");
        self.status = GameStatus::AwaitingTransition;
        match self.source.level_exit_target(self.level, self.room.id, region) {
            Some(level) => {
                self.cues.add(CueEvent::ExitLevelPending { level });
                self.pending_exit = Some(PendingExit::Level(level));
                info!(from = ?self.level, to = ?level, "level exit");
            }
            None => {
                self.cues.add(CueEvent::WinGame);
                info!(level = ?self.level, "hold completed");
            }
        }
    }

    /// Bookkeeping shared by every way out of a room.
    fn leave_room(&mut self, description: &str) {
        if self.room.conquest_monster_count() == 0 && self.conquered.insert(self.room.id) {
            self.cues.add(CueEvent::RoomConquered { room: self.room.id });
        }
        if !self.config.record_demos {
            return;
        }
        let segment = DemoSegment {
            level: self.level,
            room: self.room.id,
            first_turn: 0,
            last_turn: self.turn_no,
            description: description.to_string(),
            commands: self.history.commands.clone(),
        };
        if let Err(err) = self.persistence.write_demo_segment(&segment) {
            warn!(%err, room = ?self.room.id, "demo segment not written");
        }
    }

    /// Carries out the room or level change a frozen history deferred, or the next
    /// level after stairs. Does nothing when no transition is pending.
    pub fn complete_pending_exit(&mut self) -> Result<(), LoadError> {
        match self.pending_exit.take() {
            None => Ok(()),
            Some(PendingExit::Room { room, entry }) => {
                let orientation = self.player.orientation;
                self.cues.clear();
                self.enter_room(*room, Swordsman::new(entry, orientation));
                Ok(())
            }
            Some(PendingExit::Level(level)) => {
                let result = self.load_level(level);
                if result.is_err() {
                    self.pending_exit = Some(PendingExit::Level(level));
                }
                result
            }
        }
    }

    pub fn has_pending_exit(&self) -> bool {
        self.pending_exit.is_some()
    }
}
