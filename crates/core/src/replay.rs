use tracing::{debug, warn};

use crate::{
    config::EngineConfig,
    error::ReplayError,
    game::CurrentGame,
    hold::MemoryHold,
    journal::CommandJournal,
    persistence::NullPersistence,
    types::{Command, GameStatus, LevelId, RoomId},
};

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_status: GameStatus,
    pub final_level: LevelId,
    pub final_room: RoomId,
    pub final_turn: u32,
    pub checksum: u64,
    pub state_hash: u64,
}

/// Plays a whole journal against `hold` from the journal's starting level, following
/// room and level changes as they happen and restarting after deaths when the journal
/// says so.
pub fn replay_journal(hold: MemoryHold, journal: &CommandJournal) -> Result<ReplayResult, ReplayError> {
    let found = hold.content_hash();
    if found != journal.hold_hash {
        warn!(expected = journal.hold_hash, found, "journal recorded against another hold");
        return Err(ReplayError::HoldMismatch { expected: journal.hold_hash, found });
    }
    let config = EngineConfig { autosave_checkpoints: false, record_demos: false };
    let mut game = CurrentGame::new(Box::new(hold), Box::new(NullPersistence), config, journal.level)?;
    let commands = journal.commands();
    let total = commands.len();

    for (index, command) in commands.into_iter().enumerate() {
        if game.status() == GameStatus::AwaitingTransition && game.has_pending_exit() {
            game.complete_pending_exit()?;
        }
        let status = game.status();
        let accepted = status == GameStatus::Active
            || (status == GameStatus::Dying && command == Command::Restart);
        if !accepted {
            warn!(index, total, ?status, "journal replay stopped early");
            return Err(ReplayError::UnexpectedStop { index, total, status });
        }
        game.process_command(command);
    }

    debug!(commands = total, checksum = game.checksum(), "journal replayed");
    Ok(ReplayResult {
        final_status: game.status(),
        final_level: game.level(),
        final_room: game.room().id,
        final_turn: game.turn_no(),
        checksum: game.checksum(),
        state_hash: game.state_hash(),
    })
}
