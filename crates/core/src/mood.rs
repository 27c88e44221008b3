//! Swordsman mood: a presentation hint derived from nearby monsters and recent kills.
//! Nothing in the simulation reads it back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cue::{CueEvent, CueEvents};

/// Kills older than this many turns fall out of the tiredness window.
pub const KILL_WINDOW: u32 = 40;
pub const TIRED_KILLS: usize = 8;
/// Monsters within this range make the swordsman aggressive and block tiredness.
pub const AGGRESSIVE_RANGE: u32 = 3;
pub const NERVOUS_RANGE: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Normal,
    Aggressive,
    Nervous,
}

impl Mood {
    /// Mood for the distance to the nearest live monster, if there is one.
    pub fn for_nearest(nearest: Option<u32>) -> Self {
        match nearest {
            Some(d) if d <= NERVOUS_RANGE => Self::Nervous,
            Some(d) if d <= AGGRESSIVE_RANGE => Self::Aggressive,
            _ => Self::Normal,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoodTracker {
    mood: Mood,
    kills: VecDeque<u32>,
    tired: bool,
}

impl MoodTracker {
    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn is_tired(&self) -> bool {
        self.tired
    }

    pub fn record_kill(&mut self, turn: u32) {
        self.kills.push_back(turn);
    }

    /// Re-evaluates after a turn. Emits a mood cue on change and the tired cue
    /// once per latch.
    pub fn update(&mut self, turn: u32, nearest: Option<u32>, cues: &mut CueEvents) {
        while self.kills.front().is_some_and(|&t| t + KILL_WINDOW <= turn) {
            self.kills.pop_front();
        }
        if self.kills.is_empty() {
            self.tired = false;
        }

        let mood = Mood::for_nearest(nearest);
        if mood != self.mood {
            self.mood = mood;
            cues.add(CueEvent::SwordsmanMood { mood });
        }

        let clear = nearest.is_none_or(|d| d > AGGRESSIVE_RANGE);
        if !self.tired && self.kills.len() >= TIRED_KILLS && clear {
            self.tired = true;
            cues.add(CueEvent::SwordsmanTired);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::CueKind;

    #[test]
    fn mood_follows_the_nearest_monster() {
        assert_eq!(Mood::for_nearest(None), Mood::Normal);
        assert_eq!(Mood::for_nearest(Some(1)), Mood::Nervous);
        assert_eq!(Mood::for_nearest(Some(3)), Mood::Aggressive);
        assert_eq!(Mood::for_nearest(Some(4)), Mood::Normal);
    }

    #[test]
    fn tired_latches_once_and_clears_with_the_window() {
        let mut tracker = MoodTracker::default();
        let mut cues = CueEvents::new();
        for turn in 1..=TIRED_KILLS as u32 {
            tracker.record_kill(turn);
        }
        tracker.update(9, None, &mut cues);
        assert_eq!(cues.count(CueKind::SwordsmanTired), 1);

        cues.clear();
        tracker.update(10, None, &mut cues);
        assert!(cues.is_empty());
        assert!(tracker.is_tired());

        tracker.update(8 + KILL_WINDOW, None, &mut cues);
        assert!(!tracker.is_tired());
        assert!(cues.is_empty());
    }

    #[test]
    fn nearby_monsters_hold_tiredness_back() {
        let mut tracker = MoodTracker::default();
        let mut cues = CueEvents::new();
        for turn in 1..=TIRED_KILLS as u32 {
            tracker.record_kill(turn);
        }
        tracker.update(9, Some(2), &mut cues);
        assert!(!cues.has_occurred(CueKind::SwordsmanTired));
        assert_eq!(cues.first(CueKind::SwordsmanMood), Some(&CueEvent::SwordsmanMood { mood: Mood::Aggressive }));
    }
}
