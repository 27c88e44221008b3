use super::*;

impl CurrentGame {
    /// Points the path maps at the player while a brain senses them.
    pub(super) fn refresh_brain_paths(&mut self) {
        if !monster::brain_senses_player(&self.room, &self.player) {
            return;
        }
        let stale = self.room.path_map(MovementClass::Ground).target() != Some(self.player.pos);
        if stale || self.room.plotted_this_turn() {
            self.room.recompute_path_maps(self.player.pos);
        }
    }

    /// One pass over the monsters alive at the start of the phase, in process order.
    pub(super) fn process_monsters(&mut self, player_action: PlayerAction) {
        let order = self.room.order().to_vec();
        for id in order {
            let ready = self.room.monster(id).is_some_and(|m| m.alive && !m.first_turn);
            if !ready {
                continue;
            }
            self.refresh_brain_paths();
            let brain_active = monster::brain_senses_player(&self.room, &self.player);
            let mut ctx = MonsterTurn {
                room: &mut self.room,
                player: &self.player,
                cues: &mut self.cues,
                turn_no: self.turn_no,
                brain_active,
                player_action,
            };
            let outcome = monster::process(&mut ctx, id);
            self.apply_outcome(id, outcome);
            if self.cues.has_occurred(CueKind::MonsterKilledPlayer) {
                break;
            }
        }
    }

    fn apply_outcome(&mut self, id: MonsterId, outcome: Outcome) {
        match outcome {
            Outcome::Done => {}
            Outcome::SwordMoved => {
                if let Some(sword) = self.room.monster(id).and_then(Monster::sword_pos) {
                    self.stab(sword);
                }
            }
            Outcome::Hatched => {
                let pos = self.room.monster(id).expect("hatching egg exists").pos;
                let roach = Monster::new(MonsterBody::Roach, pos, Orientation::S);
                let roach_id = self.room.replace_monster(id, roach);
                debug!(egg = ?id, roach = ?roach_id, ?pos, "egg hatched");
            }
            Outcome::ExitedRoom => self.room.remove_monster(id),
            Outcome::Truncated => {
                for segment in monster::serpent_segments(&self.room, id) {
                    self.room.plot(segment, ItemTile::Empty, None);
                }
                self.kill_monster(id);
            }
            Outcome::Asked { text } => {
                self.questions.push_back(PendingQuestion { monster: id, text });
            }
        }
    }
}
