use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;
use crate::types::Pos;

/// The player. Always carries a sword on the square it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swordsman {
    pub pos: Pos,
    pub orientation: Orientation,
    pub visible: bool,
    /// Between drinking a mimic potion and confirming where the mimic goes.
    pub placing_mimic: bool,
    pub cursor: Pos,
    pub dying: bool,
}

impl Swordsman {
    pub fn new(pos: Pos, orientation: Orientation) -> Self {
        assert_ne!(orientation, Orientation::None, "the swordsman always faces somewhere");
        Self { pos, orientation, visible: true, placing_mimic: false, cursor: pos, dying: false }
    }

    pub fn sword_pos(&self) -> Pos {
        self.pos.step(self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sword_follows_orientation() {
        let mut player = Swordsman::new(Pos::new(3, 3), Orientation::N);
        assert_eq!(player.sword_pos(), Pos::new(3, 2));
        player.orientation = player.orientation.rotate_cw();
        assert_eq!(player.sword_pos(), Pos::new(4, 2));
    }
}
