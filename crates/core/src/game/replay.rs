use super::*;
use crate::error::ReplayError;

impl CurrentGame {
    /// Rebuilds the current room visit by playing `commands` from the room entry.
    /// History stays frozen meanwhile, so a room exit is left pending for the caller.
    /// If the room stops accepting commands before the last one, the entry state is
    /// restored and the error says where playback stopped.
    pub fn play_commands(&mut self, commands: &[Command]) -> Result<(), ReplayError> {
        let entry = self.room_entry.as_deref().cloned().expect("room entry is recorded on every visit");
        self.restore(entry.clone());
        self.checkpoint = None;
        self.cues.clear();
        self.history.frozen = true;
        debug!(room = ?self.room.id, commands = commands.len(), "playing commands");

        for (index, &command) in commands.iter().enumerate() {
            let restartable = command == Command::Restart && self.status == GameStatus::Dying;
            if self.status != GameStatus::Active && !restartable {
                let status = self.status;
                self.history.frozen = false;
                self.restore(entry);
                self.cues.clear();
                warn!(room = ?self.room.id, index, ?status, "playback stopped early");
                return Err(ReplayError::UnexpectedStop { index, total: commands.len(), status });
            }
            self.process_command(command);
            if self.cues.has_occurred(CueKind::CheckpointActivated)
                && let Some(checkpoint) = self.checkpoint.as_deref_mut()
            {
                checkpoint.history_len = index + 1;
            }
        }

        self.history.frozen = false;
        self.history.commands = commands.to_vec();
        Ok(())
    }

    /// Takes back the last `turns` commands of this room visit.
    pub fn undo_turns(&mut self, turns: usize) -> Result<(), ReplayError> {
        let keep = self.history.commands.len().saturating_sub(turns);
        let commands = self.history.commands[..keep].to_vec();
        self.play_commands(&commands)
    }
}
