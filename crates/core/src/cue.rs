//! Cue events: the ordered log of notable things that happened during one turn.
//! Presentation layers read it after `process_command` returns to pick sounds,
//! animations and prompts. Each kind carries a fixed payload by value.

use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::mood::Mood;
use crate::orientation::Orientation;
use crate::types::{LevelId, MonsterId, Pos, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionKind {
    Mimic,
    Invisibility,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(CueKind), derive(Hash, PartialOrd, Ord))]
pub enum CueEvent {
    MonsterKilledPlayer { monster: MonsterId },
    MonsterDied { monster: MonsterId, pos: Pos },
    RoomConquered { room: RoomId },
    AllMonstersKilled,
    GreenDoorsOpened,
    RedDoorsOpened,
    CheckpointActivated { pos: Pos },
    PlotsHappened,
    HitObstacle { pos: Pos },
    Scared { pos: Pos },
    SteppedOnScroll { pos: Pos, text: String },
    DrankPotion { pos: Pos, potion: PotionKind },
    InvisibilityToggled { visible: bool },
    MimicPlacementStarted,
    MimicPlaced { pos: Pos },
    OrbActivated { pos: Pos },
    CrumblyWallDestroyed { pos: Pos },
    TrapdoorFell { pos: Pos },
    TarDestroyed { pos: Pos },
    TarBabyFormed { pos: Pos },
    TarGrew,
    EggsLaid { count: u32 },
    EggHatched { pos: Pos },
    EvilEyeWoke { monster: MonsterId },
    SnakeDiedFromTruncation { monster: MonsterId },
    NeatherExitedRoom { monster: MonsterId },
    MonsterSpokeWithQuestion { monster: MonsterId, text: String },
    QuestionAnswered { monster: MonsterId, yes: bool },
    ExitRoom { direction: Orientation, room: RoomId },
    ExitRoomPending { direction: Orientation, room: RoomId },
    ExitLevelPending { level: LevelId },
    WinGame,
    SwordsmanMood { mood: Mood },
    SwordsmanTired,
    RoomRestarted,
}

impl CueEvent {
    pub fn kind(&self) -> CueKind {
        CueKind::from(self)
    }
}

/// Events produced by one turn, in the order they occurred.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CueEvents {
    events: Vec<CueEvent>,
}

impl CueEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn add(&mut self, event: CueEvent) {
        self.events.push(event);
    }

    /// Adds `event` unless an event of the same kind is already logged.
    pub fn add_once(&mut self, event: CueEvent) {
        if !self.has_occurred(event.kind()) {
            self.events.push(event);
        }
    }

    pub fn has_occurred(&self, kind: CueKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    pub fn first(&self, kind: CueKind) -> Option<&CueEvent> {
        self.events.iter().find(|e| e.kind() == kind)
    }

    pub fn of_kind(&self, kind: CueKind) -> impl Iterator<Item = &CueEvent> {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    pub fn count(&self, kind: CueKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CueEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_by_kind_preserve_insertion_order() {
        let mut cues = CueEvents::new();
        cues.add(CueEvent::HitObstacle { pos: Pos::new(1, 1) });
        cues.add(CueEvent::TarGrew);
        cues.add(CueEvent::HitObstacle { pos: Pos::new(2, 1) });

        assert!(cues.has_occurred(CueKind::TarGrew));
        assert!(!cues.has_occurred(CueKind::WinGame));
        assert_eq!(
            cues.first(CueKind::HitObstacle),
            Some(&CueEvent::HitObstacle { pos: Pos::new(1, 1) })
        );
        let positions: Vec<_> = cues
            .of_kind(CueKind::HitObstacle)
            .map(|e| match e {
                CueEvent::HitObstacle { pos } => *pos,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(positions, vec![Pos::new(1, 1), Pos::new(2, 1)]);
    }

    #[test]
    fn add_once_keeps_the_first_event_of_a_kind() {
        let mut cues = CueEvents::new();
        cues.add_once(CueEvent::TarGrew);
        cues.add_once(CueEvent::TarGrew);
        assert_eq!(cues.count(CueKind::TarGrew), 1);
        cues.clear();
        assert!(cues.is_empty());
    }
}
