//! Breadth-first distance fields toward a target square.
//! Brain-directed monsters read these instead of beelining. A map is rebuilt only
//! when asked to; between rebuilds it keeps answering for its last target.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::orientation::Orientation;
use crate::types::Pos;

pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathMap {
    cols: usize,
    rows: usize,
    target: Option<Pos>,
    dist: Vec<u32>,
}

impl PathMap {
    /// An empty map; every square is unreachable until the first `compute`.
    pub fn new(cols: usize, rows: usize) -> Option<Self> {
        let mut dist = Vec::new();
        dist.try_reserve_exact(cols * rows).ok()?;
        dist.resize(cols * rows, UNREACHABLE);
        Some(Self { cols, rows, target: None, dist })
    }

    pub(crate) fn empty() -> Self {
        Self { cols: 0, rows: 0, target: None, dist: Vec::new() }
    }

    pub fn target(&self) -> Option<Pos> {
        self.target
    }

    /// Rebuilds the field from `target`. `blocked` decides which squares can be crossed;
    /// the target itself is always reachable.
    pub fn compute(&mut self, target: Pos, blocked: impl Fn(Pos) -> bool) {
        self.dist.fill(UNREACHABLE);
        self.target = Some(target);
        let Some(start) = self.index(target) else {
            return;
        };
        self.dist[start] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(target);
        while let Some(current) = queue.pop_front() {
            let next_dist = self.dist[self.index(current).expect("queued squares are in bounds")] + 1;
            for o in Orientation::COMPASS {
                let n = current.step(o);
                let Some(i) = self.index(n) else {
                    continue;
                };
                if self.dist[i] != UNREACHABLE || blocked(n) {
                    continue;
                }
                self.dist[i] = next_dist;
                queue.push_back(n);
            }
        }
    }

    pub fn distance(&self, pos: Pos) -> u32 {
        self.index(pos).map_or(UNREACHABLE, |i| self.dist[i])
    }

    /// First step on a shortest path from `pos`, or `None` at the target or when unreachable.
    pub fn direction(&self, pos: Pos) -> Orientation {
        let here = self.distance(pos);
        if here == UNREACHABLE || here == 0 {
            return Orientation::None;
        }
        Orientation::COMPASS
            .into_iter()
            .find(|&o| self.distance(pos.step(o)) < here)
            .unwrap_or(Orientation::None)
    }

    /// Every reachable neighbour of `pos`, nearest to the target first.
    /// Equal distances keep compass enumeration order.
    pub fn rec_paths(&self, pos: Pos) -> ArrayVec<Orientation, 8> {
        let mut candidates: ArrayVec<Orientation, 8> = Orientation::COMPASS
            .into_iter()
            .filter(|&o| self.distance(pos.step(o)) != UNREACHABLE)
            .collect();
        candidates.sort_by_key(|&o| self.distance(pos.step(o)));
        candidates
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.cols || pos.y as usize >= self.rows {
            return None;
        }
        Some(pos.y as usize * self.cols + pos.x as usize)
    }
}
