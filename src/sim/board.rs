//! Board occupancy and removal queries
//!
//! Bubbles live in a flat `Vec` on the game state. For neighbor lookups we
//! build a grid of indices into that slice, row-major (y * WIDTH + x).

use std::collections::{HashSet, VecDeque};

use super::state::{Bubble, BubbleKind, Position};
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Cell -> bubble index lookup for one board configuration
#[derive(Debug, Clone)]
pub struct Grid {
    cells: [Option<usize>; BOARD_SIZE],
}

impl Grid {
    /// Index `bubbles` by position. Later bubbles win a shared cell.
    pub fn build(bubbles: &[Bubble]) -> Self {
        let mut cells = [None; BOARD_SIZE];
        for (i, bubble) in bubbles.iter().enumerate() {
            cells[Self::index(bubble.pos)] = Some(i);
        }
        Self { cells }
    }

    #[inline(always)]
    fn index(pos: Position) -> usize {
        pos.y as usize * BOARD_WIDTH as usize + pos.x as usize
    }

    /// Bubble index at `pos`
    pub fn get(&self, pos: Position) -> Option<usize> {
        self.cells[Self::index(pos)]
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Move the occupant of `from` to `to`. `to` must be empty.
    pub fn relocate(&mut self, from: Position, to: Position) {
        debug_assert!(!self.is_occupied(to), "relocating onto an occupied cell");
        self.cells[Self::index(to)] = self.cells[Self::index(from)].take();
    }
}

/// Indices of the normal bubbles sharing `start`'s color that are connected to
/// it through orthogonal neighbors. Empty when `start` is not a normal bubble.
pub fn connected_group(bubbles: &[Bubble], grid: &Grid, start: usize) -> Vec<usize> {
    let Some(origin) = bubbles.get(start) else {
        return Vec::new();
    };
    let matches = |b: &Bubble| b.kind == BubbleKind::Normal && b.color == origin.color;
    if !matches(origin) {
        return Vec::new();
    }

    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut group = Vec::new();

    while let Some(i) = queue.pop_front() {
        group.push(i);
        for pos in bubbles[i].pos.neighbors() {
            if let Some(j) = grid.get(pos) {
                if matches(&bubbles[j]) && seen.insert(j) {
                    queue.push_back(j);
                }
            }
        }
    }

    group
}

/// Indices a bomb at `bomb` clears: itself plus every normal bubble of its color
pub fn bomb_blast(bubbles: &[Bubble], bomb: usize) -> Vec<usize> {
    let color = bubbles[bomb].color;
    std::iter::once(bomb)
        .chain(
            bubbles
                .iter()
                .enumerate()
                .filter(|(_, b)| b.kind == BubbleKind::Normal && b.color == color)
                .map(|(i, _)| i),
        )
        .collect()
}

/// Every removable group on the board with its click target, largest first
pub fn removable_groups(bubbles: &[Bubble], min_size: usize) -> Vec<(usize, usize)> {
    let grid = Grid::build(bubbles);
    let mut claimed = vec![false; bubbles.len()];
    let mut groups = Vec::new();

    for (i, bubble) in bubbles.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        let size = match bubble.kind {
            BubbleKind::Bomb => bomb_blast(bubbles, i).len(),
            BubbleKind::Normal => {
                let group = connected_group(bubbles, &grid, i);
                for &j in &group {
                    claimed[j] = true;
                }
                if group.len() < min_size {
                    continue;
                }
                group.len()
            }
        };
        groups.push((i, size));
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}
