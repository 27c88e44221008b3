//! Compass orientations and the distance metrics movement code is built on.
//! This module exists so every mover shares one mapping between directions and offsets.
//! It does not know about tiles, rooms or monsters.

use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::types::Pos;

/// One of the eight compass directions, or `None` for "no direction".
///
/// The discriminant is `(dy + 1) * 3 + (dx + 1)`, so the nine values cover
/// every offset in `{-1, 0, 1}²` exactly once and `None` is `(0, 0)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRepr,
)]
#[repr(u8)]
pub enum Orientation {
    NW = 0,
    N = 1,
    NE = 2,
    W = 3,
    None = 4,
    E = 5,
    SW = 6,
    S = 7,
    SE = 8,
}

impl Orientation {
    /// All eight compass directions in enumeration order.
    pub const COMPASS: [Orientation; 8] = [
        Orientation::NW,
        Orientation::N,
        Orientation::NE,
        Orientation::W,
        Orientation::E,
        Orientation::SW,
        Orientation::S,
        Orientation::SE,
    ];

    pub const CARDINAL: [Orientation; 4] =
        [Orientation::N, Orientation::E, Orientation::S, Orientation::W];

    /// Panics unless both deltas are in `{-1, 0, 1}`.
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy), "delta ({dx},{dy}) out of range");
        let code = (dy + 1) * 3 + (dx + 1);
        Self::from_repr(code as u8).expect("code is within 0..9")
    }

    /// Orientation of the sign of an arbitrary delta.
    pub fn toward(dx: i32, dy: i32) -> Self {
        Self::from_delta(dx.signum(), dy.signum())
    }

    pub fn dx(self) -> i32 {
        (self as i32) % 3 - 1
    }

    pub fn dy(self) -> i32 {
        (self as i32) / 3 - 1
    }

    pub fn is_cardinal(self) -> bool {
        self != Self::None && (self.dx() == 0 || self.dy() == 0)
    }

    pub fn opposite(self) -> Self {
        Self::from_delta(-self.dx(), -self.dy())
    }

    /// Next compass direction clockwise. Panics on `None`.
    pub fn rotate_cw(self) -> Self {
        match self {
            Self::N => Self::NE,
            Self::NE => Self::E,
            Self::E => Self::SE,
            Self::SE => Self::S,
            Self::S => Self::SW,
            Self::SW => Self::W,
            Self::W => Self::NW,
            Self::NW => Self::N,
            Self::None => panic!("cannot rotate Orientation::None"),
        }
    }

    /// Next compass direction counterclockwise. Panics on `None`.
    pub fn rotate_ccw(self) -> Self {
        match self {
            Self::N => Self::NW,
            Self::NW => Self::W,
            Self::W => Self::SW,
            Self::SW => Self::S,
            Self::S => Self::SE,
            Self::SE => Self::E,
            Self::E => Self::NE,
            Self::NE => Self::N,
            Self::None => panic!("cannot rotate Orientation::None"),
        }
    }
}

/// "Squares away": the larger of the two axis distances.
pub fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

pub fn euclidean(a: Pos, b: Pos) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_delta_maps_to_exactly_one_orientation() {
        let mut seen = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                let o = Orientation::from_delta(dx, dy);
                assert_eq!((o.dx(), o.dy()), (dx, dy));
                assert!(!seen.contains(&o));
                seen.push(o);
            }
        }
        assert_eq!(Orientation::from_delta(0, 0), Orientation::None);
    }

    #[test]
    fn rotations_are_inverse_and_cycle_through_eight_steps() {
        let mut o = Orientation::N;
        for _ in 0..8 {
            assert_eq!(o.rotate_cw().rotate_ccw(), o);
            o = o.rotate_cw();
        }
        assert_eq!(o, Orientation::N);
        assert_eq!(Orientation::N.rotate_cw(), Orientation::NE);
        assert_eq!(Orientation::W.rotate_ccw(), Orientation::SW);
    }

    #[test]
    #[should_panic(expected = "cannot rotate")]
    fn rotating_none_is_a_contract_violation() {
        let _ = Orientation::None.rotate_cw();
    }

    #[test]
    fn chebyshev_counts_diagonals_as_one_square() {
        assert_eq!(chebyshev(Pos::new(0, 0), Pos::new(3, 2)), 3);
        assert_eq!(chebyshev(Pos::new(5, 5), Pos::new(5, 5)), 0);
        assert!((euclidean(Pos::new(0, 0), Pos::new(3, 4)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toward_uses_the_sign_of_each_axis() {
        assert_eq!(Orientation::toward(-7, 2), Orientation::SW);
        assert_eq!(Orientation::toward(0, -3), Orientation::N);
        assert_eq!(Orientation::E.opposite(), Orientation::W);
        assert!(Orientation::S.is_cardinal());
        assert!(!Orientation::SE.is_cardinal());
    }
}
