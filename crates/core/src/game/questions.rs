use super::*;

impl CurrentGame {
    /// Spends the command on the oldest open question. Anything but `Yes` is a no.
    pub(super) fn answer_question(&mut self, question: PendingQuestion, command: Command) {
        let yes = command == Command::Yes;
        self.cues.add(CueEvent::QuestionAnswered { monster: question.monster, yes });
        if let Some(MonsterBody::Neather { hostile, .. }) =
            self.room.monster_mut(question.monster).map(|m| &mut m.body)
        {
            *hostile = !yes;
        }
        debug!(monster = ?question.monster, yes, "question answered");
    }
}
