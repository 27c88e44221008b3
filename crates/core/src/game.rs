//! The turn engine for one player in one room at a time.
//! `CurrentGame` owns the live room, the swordsman and every per-visit counter, and
//! drives one turn per `process_command`. Focused submodules extend `impl CurrentGame`.

use std::collections::{BTreeSet, VecDeque};
use std::mem;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::cue::{CueEvent, CueEvents, CueKind};
use crate::error::{LoadError, PersistenceError};
use crate::hold::LevelSource;
use crate::monster::{self, Monster, MonsterBody, MonsterKind, MonsterTurn, Outcome, PlayerAction};
use crate::mood::{Mood, MoodTracker};
use crate::orientation::{Orientation, chebyshev};
use crate::persistence::{Persistence, SavedGame};
use crate::room::Room;
use crate::swordsman::Swordsman;
use crate::tiles::{ItemTile, OpaqueTile};
use crate::types::*;

mod exits;
mod hash;
mod monsters;
mod player;
mod questions;
mod replay;
mod tar;

#[cfg(test)]
mod test_support;

/// Commands accepted since the player entered the current room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandHistory {
    commands: Vec<Command>,
    frozen: bool,
}

impl CommandHistory {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// While frozen, nothing is appended and room exits wait for the caller.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn push(&mut self, command: Command) {
        if !self.frozen {
            self.commands.push(command);
        }
    }
}

/// A yes/no question a monster asked, waiting for the player's next command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingQuestion {
    pub monster: MonsterId,
    pub text: String,
}

/// A transition that was decided but not carried out yet.
#[derive(Clone, Debug)]
enum PendingExit {
    Room { room: Box<Room>, entry: Pos },
    Level(LevelId),
}

/// Everything restored by a restart.
#[derive(Clone, Debug)]
struct Snapshot {
    room: Room,
    player: Swordsman,
    turn_no: u32,
    questions: VecDeque<PendingQuestion>,
    mood: MoodTracker,
    on_checkpoint: bool,
    explored: BTreeSet<RoomId>,
    conquered: BTreeSet<RoomId>,
    history_len: usize,
}

pub struct CurrentGame {
    source: Box<dyn LevelSource>,
    persistence: Box<dyn Persistence>,
    config: EngineConfig,
    level: LevelId,
    room: Room,
    player: Swordsman,
    status: GameStatus,
    turn_no: u32,
    cues: CueEvents,
    history: CommandHistory,
    questions: VecDeque<PendingQuestion>,
    mood: MoodTracker,
    explored: BTreeSet<RoomId>,
    conquered: BTreeSet<RoomId>,
    on_checkpoint: bool,
    /// Tar squares hit by any sword this turn, resolved together after the monsters move.
    stabs: Vec<Pos>,
    pending_exit: Option<PendingExit>,
    room_entry: Option<Box<Snapshot>>,
    checkpoint: Option<Box<Snapshot>>,
}

impl CurrentGame {
    /// Starts a session at `level`'s entrance.
    pub fn new(
        source: Box<dyn LevelSource>,
        persistence: Box<dyn Persistence>,
        config: EngineConfig,
        level: LevelId,
    ) -> Result<Self, LoadError> {
        let (room, player) = load_entrance(source.as_ref(), level)?;
        let mut game = Self {
            source,
            persistence,
            config,
            level,
            room,
            player,
            status: GameStatus::Active,
            turn_no: 0,
            cues: CueEvents::new(),
            history: CommandHistory::default(),
            questions: VecDeque::new(),
            mood: MoodTracker::default(),
            explored: BTreeSet::new(),
            conquered: BTreeSet::new(),
            on_checkpoint: false,
            stabs: Vec::new(),
            pending_exit: None,
            room_entry: None,
            checkpoint: None,
        };
        game.begin_room_visit();
        game.report_save(|p, state| p.save_level_begin(state), "level begin");
        info!(level = ?level, room = ?game.room.id, "session started");
        Ok(game)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn_no(&self) -> u32 {
        self.turn_no
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn player(&self) -> &Swordsman {
        &self.player
    }

    /// Events of the last processed command.
    pub fn cues(&self) -> &CueEvents {
        &self.cues
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mood(&self) -> Mood {
        self.mood.mood()
    }

    pub fn explored_rooms(&self) -> &BTreeSet<RoomId> {
        &self.explored
    }

    pub fn conquered_rooms(&self) -> &BTreeSet<RoomId> {
        &self.conquered
    }

    pub fn pending_question(&self) -> Option<&PendingQuestion> {
        self.questions.front()
    }

    /// Starts `level` over from its entrance. On failure the current state is untouched.
    pub fn load_level(&mut self, level: LevelId) -> Result<(), LoadError> {
        let (room, player) = load_entrance(self.source.as_ref(), level)?;
        self.level = level;
        self.cues.clear();
        self.enter_room(room, player);
        self.report_save(|p, state| p.save_level_begin(state), "level begin");
        info!(level = ?level, room = ?self.room.id, "level loaded");
        Ok(())
    }

    /// Puts the player into room `id` at `pos`. On failure the current state is untouched.
    pub fn load_room(&mut self, id: RoomId, pos: Pos, orientation: Orientation) -> Result<(), LoadError> {
        let data = self.source.load_room(id)?;
        let room = Room::from_data(&data)?;
        if !room.is_valid(pos) {
            return Err(LoadError::BadEntrance { pos });
        }
        self.level = data.level;
        self.cues.clear();
        self.enter_room(room, Swordsman::new(pos, orientation));
        Ok(())
    }

    /// Advances one turn. Panics unless the game is `Active`, except for
    /// `Command::Restart`, which is also accepted while dying.
    pub fn process_command(&mut self, command: Command) -> &CueEvents {
        if command == Command::Restart {
            self.restart();
            return &self.cues;
        }
        assert_eq!(self.status, GameStatus::Active, "process_command needs an active room visit");

        self.history.push(command);
        self.cues.clear();
        self.room.clear_plot_flag();
        self.room.purge_dead();

        if let Some(question) = self.questions.pop_front() {
            self.answer_question(question, command);
            return &self.cues;
        }

        self.turn_no += 1;
        let monsters_before = self.room.conquest_monster_count();
        let room_before = self.room.id;

        if self.player.placing_mimic {
            self.process_mimic_placement(command);
        } else {
            let action = self.process_player_move(command);
            if self.room.id == room_before && self.status == GameStatus::Active {
                self.refresh_brain_paths();
                self.process_monsters(action);
                self.resolve_simultaneous_stabs();
                self.grow_tar_if_flagged();
                self.room.clear_first_turn_flags();
                self.update_mood();
            }
        }

        if self.room.id == room_before {
            self.finish_turn(monsters_before);
        }
        &self.cues
    }

    /// Death, conquest, checkpoints, green doors and the plot notice, in that order.
    fn finish_turn(&mut self, monsters_before: usize) {
        let monsters_now = self.room.conquest_monster_count();
        if self.cues.has_occurred(CueKind::MonsterKilledPlayer) {
            self.player.dying = true;
            self.status = GameStatus::Dying;
            debug!(room = ?self.room.id, turn = self.turn_no, "player killed");
        } else if monsters_before > 0 && monsters_now == 0 && !self.conquered.contains(&self.room.id) {
            self.conquered.insert(self.room.id);
            self.cues.add(CueEvent::RoomConquered { room: self.room.id });
        }

        let on_checkpoint = self.room.opaque(self.player.pos) == OpaqueTile::Checkpoint;
        let stepped_on = on_checkpoint && !self.on_checkpoint;
        self.on_checkpoint = on_checkpoint;
        if stepped_on && !self.player.dying {
            self.cues.add(CueEvent::CheckpointActivated { pos: self.player.pos });
            self.checkpoint = Some(Box::new(self.snapshot()));
            if self.config.autosave_checkpoints {
                self.report_save(|p, state| p.save_checkpoint(state), "checkpoint");
            }
        }

        if monsters_before > 0 && monsters_now == 0 {
            self.cues.add(CueEvent::AllMonstersKilled);
            self.open_doors(OpaqueTile::DoorGreen, CueEvent::GreenDoorsOpened);
        }

        if self.room.plotted_this_turn() {
            self.cues.add(CueEvent::PlotsHappened);
        }
    }

    /// Back to the last checkpoint of this visit, or to the room entry.
    fn restart(&mut self) {
        assert_ne!(
            self.status,
            GameStatus::AwaitingTransition,
            "restart needs the pending transition completed first"
        );
        let snapshot = self.checkpoint.as_deref().or(self.room_entry.as_deref()).cloned();
        if let Some(snapshot) = snapshot {
            self.restore(snapshot);
        }
        self.cues.clear();
        self.cues.add(CueEvent::RoomRestarted);
        debug!(room = ?self.room.id, turn = self.turn_no, "room restarted");
    }

    fn enter_room(&mut self, room: Room, player: Swordsman) {
        self.room = room;
        self.player = player;
        self.begin_room_visit();
    }

    /// Resets per-visit state for the room and player just installed.
    fn begin_room_visit(&mut self) {
        if self.conquered.contains(&self.room.id) {
            let conquest: Vec<MonsterId> = self
                .room
                .live_monsters()
                .filter(|(_, m)| m.counts_for_conquest())
                .map(|(id, _)| id)
                .collect();
            for id in conquest {
                self.room.remove_monster(id);
            }
            self.room.purge_dead();
        }
        self.status = GameStatus::Active;
        self.turn_no = 0;
        self.history = CommandHistory { commands: Vec::new(), frozen: self.history.frozen };
        self.questions.clear();
        self.mood = MoodTracker::default();
        self.stabs.clear();
        self.pending_exit = None;
        self.explored.insert(self.room.id);
        self.on_checkpoint = self.room.opaque(self.player.pos) == OpaqueTile::Checkpoint;
        self.refresh_brain_paths();
        self.checkpoint = None;
        self.room_entry = Some(Box::new(self.snapshot()));
        self.report_save(|p, state| p.save_room_begin(state), "room begin");
        debug!(room = ?self.room.id, pos = ?self.player.pos, "room visit started");
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            room: self.room.clone(),
            player: self.player,
            turn_no: self.turn_no,
            questions: self.questions.clone(),
            mood: self.mood.clone(),
            on_checkpoint: self.on_checkpoint,
            explored: self.explored.clone(),
            conquered: self.conquered.clone(),
            history_len: self.history.commands.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.room = snapshot.room;
        self.player = snapshot.player;
        self.turn_no = snapshot.turn_no;
        self.questions = snapshot.questions;
        self.mood = snapshot.mood;
        self.on_checkpoint = snapshot.on_checkpoint;
        self.explored = snapshot.explored;
        self.conquered = snapshot.conquered;
        if !self.history.frozen {
            self.history.commands.truncate(snapshot.history_len);
        }
        self.status = GameStatus::Active;
        self.stabs.clear();
        self.pending_exit = None;
    }

    pub fn saved_game(&self) -> SavedGame {
        SavedGame {
            level: self.level,
            room: self.room.id,
            player: self.player,
            turn_no: self.turn_no,
            commands: self.history.commands.clone(),
            explored: self.explored.clone(),
            conquered: self.conquered.clone(),
        }
    }

    fn report_save(
        &mut self,
        save: impl FnOnce(&mut dyn Persistence, &SavedGame) -> Result<(), PersistenceError>,
        what: &str,
    ) {
        let state = self.saved_game();
        if let Err(err) = save(self.persistence.as_mut(), &state) {
            warn!(%err, what, room = ?self.room.id, "save failed");
        }
    }

    /// Replaces every `door` tile with floor, announcing it when there was one.
    fn open_doors(&mut self, door: OpaqueTile, event: CueEvent) {
        let doors = self.room.squares_with(door);
        if doors.is_empty() {
            return;
        }
        for pos in doors {
            self.room.plot(pos, OpaqueTile::Floor, None);
        }
        self.cues.add(event);
    }

    fn update_mood(&mut self) {
        let player = self.player.pos;
        let nearest = self.room.live_monsters().map(|(_, m)| chebyshev(m.pos, player)).min();
        self.mood.update(self.turn_no, nearest, &mut self.cues);
    }
}

fn load_entrance(source: &dyn LevelSource, level: LevelId) -> Result<(Room, Swordsman), LoadError> {
    let entrance = source.level_entrance(level)?;
    let data = source.load_room(entrance.room)?;
    let room = Room::from_data(&data)?;
    let pos = Pos::new(entrance.x, entrance.y);
    if !room.is_valid(pos) || entrance.orientation == Orientation::None {
        return Err(LoadError::BadEntrance { pos });
    }
    Ok((room, Swordsman::new(pos, entrance.orientation)))
}
