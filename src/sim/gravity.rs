//! Gravity resolution
//!
//! Bubbles settle toward row 0 one cell per pass until nothing moves.
//! Columns are independent: adjacency matters for removal, not for falling.

use super::board::Grid;
use super::state::{Animation, Bubble, Position};

/// What a gravity run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityReport {
    /// Fixed-point passes run, including the final pass that moved nothing
    pub passes: u32,
    /// Distinct bubbles that fell at least one cell
    pub moved: usize,
}

/// Settle `bubbles` in place. Only bubbles that move are tagged `Fall`.
pub fn settle(bubbles: &mut [Bubble]) -> GravityReport {
    let mut grid = Grid::build(bubbles);

    // Lower bubbles first so a whole stack drops together in one pass
    let mut order: Vec<usize> = (0..bubbles.len()).collect();
    order.sort_by_key(|&i| bubbles[i].pos.y);

    let mut fell = vec![false; bubbles.len()];
    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;
        for &i in &order {
            let pos = bubbles[i].pos;
            if pos.y == 0 {
                continue;
            }
            let below = Position { x: pos.x, y: pos.y - 1 };
            if grid.is_occupied(below) {
                continue;
            }
            grid.relocate(pos, below);
            bubbles[i].pos = below;
            bubbles[i].animation = Animation::Fall;
            fell[i] = true;
            changed = true;
        }
        if !changed {
            break;
        }
    }

    let report = GravityReport {
        passes,
        moved: fell.iter().filter(|&&f| f).count(),
    };
    log::debug!("Gravity settled in {} passes, {} moved", report.passes, report.moved);
    report
}
