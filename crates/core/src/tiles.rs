//! Tile ids for both room layers and the pure predicates classifying them.
//! This module exists so obstacle rules are one function of (tile, mover) and nothing else.
//! It does not look at monsters, swords or the player's position.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::orientation::Orientation;

/// Opaque layer: exactly one per square, always present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr)]
#[repr(u8)]
pub enum OpaqueTile {
    Floor = 0,
    Wall = 1,
    CrumblyWall = 2,
    Pit = 3,
    Stairs = 4,
    Trapdoor = 5,
    Obstacle = 6,
    Checkpoint = 7,
    DoorYellow = 8,
    DoorYellowOpen = 9,
    DoorGreen = 10,
    DoorBlue = 11,
    DoorRed = 12,
}

/// Item layer: at most one per square, `Empty` by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr)]
#[repr(u8)]
pub enum ItemTile {
    Empty = 0,
    Tar = 1,
    Scroll = 2,
    PotionMimic = 3,
    PotionInvisibility = 4,
    Orb = 5,
    ArrowN = 6,
    ArrowNE = 7,
    ArrowE = 8,
    ArrowSE = 9,
    ArrowS = 10,
    ArrowSW = 11,
    ArrowW = 12,
    ArrowNW = 13,
    SnakeEW = 14,
    SnakeNS = 15,
    SnakeNE = 16,
    SnakeNW = 17,
    SnakeSE = 18,
    SnakeSW = 19,
    /// Serpent tail whose only link points north, toward the rest of the body.
    SnakeTailN = 20,
    SnakeTailE = 21,
    SnakeTailS = 22,
    SnakeTailW = 23,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Opaque(OpaqueTile),
    Item(ItemTile),
}

impl From<OpaqueTile> for Tile {
    fn from(t: OpaqueTile) -> Self {
        Tile::Opaque(t)
    }
}

impl From<ItemTile> for Tile {
    fn from(t: ItemTile) -> Self {
        Tile::Item(t)
    }
}

bitflags! {
    /// What a mover can do beyond plain ground walking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveCaps: u8 {
        /// Pits are walkable.
        const FLIES = 1;
        /// Potions are walkable.
        const DRINKS_POTIONS = 1 << 1;
        /// Closed doors are walkable. Arrows and scrolls are not.
        const SERPENT = 1 << 2;
        /// Sword squares do not block.
        const IGNORES_SWORD = 1 << 3;
    }
}

impl OpaqueTile {
    pub fn is_door(self) -> bool {
        matches!(
            self,
            Self::DoorYellow | Self::DoorYellowOpen | Self::DoorGreen | Self::DoorBlue | Self::DoorRed
        )
    }

    /// Whether the tile stops an evil eye's line of sight.
    pub fn blocks_sight(self) -> bool {
        matches!(
            self,
            Self::Wall
                | Self::CrumblyWall
                | Self::Obstacle
                | Self::DoorYellow
                | Self::DoorGreen
                | Self::DoorBlue
                | Self::DoorRed
        )
    }
}

impl ItemTile {
    pub fn arrow_direction(self) -> Option<Orientation> {
        match self {
            Self::ArrowN => Some(Orientation::N),
            Self::ArrowNE => Some(Orientation::NE),
            Self::ArrowE => Some(Orientation::E),
            Self::ArrowSE => Some(Orientation::SE),
            Self::ArrowS => Some(Orientation::S),
            Self::ArrowSW => Some(Orientation::SW),
            Self::ArrowW => Some(Orientation::W),
            Self::ArrowNW => Some(Orientation::NW),
            _ => None,
        }
    }

    pub fn is_arrow(self) -> bool {
        self.arrow_direction().is_some()
    }

    pub fn is_potion(self) -> bool {
        matches!(self, Self::PotionMimic | Self::PotionInvisibility)
    }

    pub fn is_serpent(self) -> bool {
        self.serpent_links().is_some()
    }

    /// Directions a serpent segment connects to: two for body pieces, one for tails.
    pub fn serpent_links(self) -> Option<(Orientation, Option<Orientation>)> {
        use Orientation::{E, N, S, W};
        match self {
            Self::SnakeEW => Some((E, Some(W))),
            Self::SnakeNS => Some((N, Some(S))),
            Self::SnakeNE => Some((N, Some(E))),
            Self::SnakeNW => Some((N, Some(W))),
            Self::SnakeSE => Some((S, Some(E))),
            Self::SnakeSW => Some((S, Some(W))),
            Self::SnakeTailN => Some((N, None)),
            Self::SnakeTailE => Some((E, None)),
            Self::SnakeTailS => Some((S, None)),
            Self::SnakeTailW => Some((W, None)),
            _ => None,
        }
    }

    /// Body piece linking two distinct cardinal directions. Panics otherwise.
    pub fn serpent_body(a: Orientation, b: Orientation) -> Self {
        use Orientation::{E, N, S, W};
        match (a, b) {
            (E, W) | (W, E) => Self::SnakeEW,
            (N, S) | (S, N) => Self::SnakeNS,
            (N, E) | (E, N) => Self::SnakeNE,
            (N, W) | (W, N) => Self::SnakeNW,
            (S, E) | (E, S) => Self::SnakeSE,
            (S, W) | (W, S) => Self::SnakeSW,
            _ => panic!("no serpent piece links {a:?} and {b:?}"),
        }
    }

    /// Tail piece whose single link points `toward`. Panics unless cardinal.
    pub fn serpent_tail(toward: Orientation) -> Self {
        match toward {
            Orientation::N => Self::SnakeTailN,
            Orientation::E => Self::SnakeTailE,
            Orientation::S => Self::SnakeTailS,
            Orientation::W => Self::SnakeTailW,
            other => panic!("serpent tails only link cardinally, not {other:?}"),
        }
    }
}

/// Whether `tile` blocks a monster with capabilities `caps`.
pub fn is_obstacle_for(tile: Tile, caps: MoveCaps) -> bool {
    match tile {
        Tile::Opaque(t) => match t {
            OpaqueTile::Floor
            | OpaqueTile::Checkpoint
            | OpaqueTile::DoorYellowOpen
            | OpaqueTile::Trapdoor => false,
            OpaqueTile::Pit => !caps.contains(MoveCaps::FLIES),
            t if t.is_door() => !caps.contains(MoveCaps::SERPENT),
            _ => true,
        },
        Tile::Item(t) => match t {
            ItemTile::Empty => false,
            // A body tile would overwrite the scroll.
            ItemTile::Scroll => caps.contains(MoveCaps::SERPENT),
            ItemTile::PotionMimic | ItemTile::PotionInvisibility => {
                !caps.contains(MoveCaps::DRINKS_POTIONS)
            }
            t if t.is_arrow() => caps.contains(MoveCaps::SERPENT),
            _ => true,
        },
    }
}

/// Whether the swordsman may stand on `tile`. Pits are reported separately.
pub fn is_player_obstacle(tile: Tile) -> bool {
    match tile {
        Tile::Opaque(t) => !matches!(
            t,
            OpaqueTile::Floor
                | OpaqueTile::Checkpoint
                | OpaqueTile::DoorYellowOpen
                | OpaqueTile::Trapdoor
                | OpaqueTile::Stairs
        ),
        Tile::Item(t) => {
            !(t == ItemTile::Empty || t == ItemTile::Scroll || t.is_potion() || t.is_arrow())
        }
    }
}

/// An arrow blocks travel against it: its opposite and the two directions beside that.
pub fn blocks_arrow_movement(tile: ItemTile, travel: Orientation) -> bool {
    let Some(arrow) = tile.arrow_direction() else {
        return false;
    };
    if travel == Orientation::None {
        return false;
    }
    let against = arrow.opposite();
    travel == against || travel == against.rotate_cw() || travel == against.rotate_ccw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_movers_walk_the_default_set_only() {
        let ground = MoveCaps::empty();
        for walkable in [
            Tile::Item(ItemTile::Empty),
            Tile::Opaque(OpaqueTile::Floor),
            Tile::Opaque(OpaqueTile::Checkpoint),
            Tile::Opaque(OpaqueTile::DoorYellowOpen),
            Tile::Opaque(OpaqueTile::Trapdoor),
            Tile::Item(ItemTile::Scroll),
            Tile::Item(ItemTile::ArrowSW),
        ] {
            assert!(!is_obstacle_for(walkable, ground), "{walkable:?} should be walkable");
        }
        for blocking in [
            Tile::Opaque(OpaqueTile::Wall),
            Tile::Opaque(OpaqueTile::Pit),
            Tile::Opaque(OpaqueTile::Stairs),
            Tile::Opaque(OpaqueTile::DoorYellow),
            Tile::Item(ItemTile::Tar),
            Tile::Item(ItemTile::Orb),
            Tile::Item(ItemTile::PotionMimic),
            Tile::Item(ItemTile::SnakeNS),
        ] {
            assert!(is_obstacle_for(blocking, ground), "{blocking:?} should block");
        }
    }

    #[test]
    fn capabilities_adjust_individual_tiles() {
        assert!(!is_obstacle_for(Tile::Opaque(OpaqueTile::Pit), MoveCaps::FLIES));
        assert!(!is_obstacle_for(Tile::Item(ItemTile::PotionMimic), MoveCaps::DRINKS_POTIONS));
        assert!(is_obstacle_for(Tile::Item(ItemTile::ArrowN), MoveCaps::SERPENT));
    }

    #[test]
    fn serpents_pass_doors_but_not_scrolls() {
        let serpent = MoveCaps::SERPENT | MoveCaps::IGNORES_SWORD;
        for door in [
            OpaqueTile::DoorYellow,
            OpaqueTile::DoorYellowOpen,
            OpaqueTile::DoorGreen,
            OpaqueTile::DoorBlue,
            OpaqueTile::DoorRed,
        ] {
            assert!(!is_obstacle_for(Tile::Opaque(door), serpent), "{door:?} should be walkable");
        }
        assert!(is_obstacle_for(Tile::Opaque(OpaqueTile::Wall), serpent));
        assert!(is_obstacle_for(Tile::Item(ItemTile::Scroll), serpent));
        assert!(!is_obstacle_for(Tile::Item(ItemTile::Scroll), MoveCaps::empty()));
        assert!(is_obstacle_for(Tile::Opaque(OpaqueTile::DoorRed), MoveCaps::FLIES));
    }

    #[test]
    fn obstacle_checks_are_pure() {
        let t = Tile::Item(ItemTile::ArrowE);
        let first = is_obstacle_for(t, MoveCaps::SERPENT);
        assert_eq!(first, is_obstacle_for(t, MoveCaps::SERPENT));
    }

    #[test]
    fn arrows_block_only_the_three_directions_against_them() {
        let north = ItemTile::ArrowN;
        assert!(blocks_arrow_movement(north, Orientation::S));
        assert!(blocks_arrow_movement(north, Orientation::SE));
        assert!(blocks_arrow_movement(north, Orientation::SW));
        assert!(!blocks_arrow_movement(north, Orientation::E));
        assert!(!blocks_arrow_movement(north, Orientation::N));
        assert!(!blocks_arrow_movement(ItemTile::Empty, Orientation::S));
    }

    #[test]
    fn serpent_pieces_link_the_directions_they_were_built_from() {
        let piece = ItemTile::serpent_body(Orientation::W, Orientation::S);
        assert_eq!(piece, ItemTile::SnakeSW);
        let (a, b) = piece.serpent_links().expect("serpent piece");
        assert_eq!((a, b), (Orientation::S, Some(Orientation::W)));
        assert_eq!(ItemTile::serpent_tail(Orientation::E).serpent_links(), Some((Orientation::E, None)));
    }

    #[test]
    fn player_can_drink_potions_but_not_cross_tar() {
        assert!(!is_player_obstacle(Tile::Item(ItemTile::PotionInvisibility)));
        assert!(!is_player_obstacle(Tile::Opaque(OpaqueTile::Stairs)));
        assert!(is_player_obstacle(Tile::Item(ItemTile::Tar)));
        assert!(is_player_obstacle(Tile::Opaque(OpaqueTile::CrumblyWall)));
    }
}
