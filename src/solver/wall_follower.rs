use std::collections::VecDeque;

use log::warn;

use super::{Search, Step};
use crate::grid::{CellKind, Direction, Grid, Point};

/// Which hand stays on the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Walks the maze keeping one hand on the wall.
///
/// Every cell records the move count at which it was first entered. Once the end is
/// reached, the solution is rebuilt by walking back from the end through ever lower
/// move counts, which gives a loop-free path that is usually much shorter than the
/// walk itself.
pub(crate) struct WallFollower {
    side: Side,
    current: Point,
    heading: Direction,
    /// Most recent cells, drawn as the head of the walker
    trail: VecDeque<Point>,
    next_distance: usize,
    moves: usize,
    /// A deterministic walk that takes more moves than there are (cell, heading)
    /// states is going round in circles
    move_limit: usize,
    end: Point,
}

impl WallFollower {
    const TRAIL_LEN: usize = 50;

    pub(crate) fn new(grid: &mut Grid, side: Side) -> Self {
        let start = grid.start();
        if let Some(cell) = grid.cell_mut(start) {
            cell.distance = 1;
        }
        let heading = Direction::ALL
            .into_iter()
            .find(|&dir| grid.open_neighbor(start, dir).is_some())
            .unwrap_or(Direction::East);

        Self {
            side,
            current: start,
            heading,
            trail: VecDeque::with_capacity(Self::TRAIL_LEN + 1),
            next_distance: 2,
            moves: 0,
            move_limit: 4 * grid.num_rows() * grid.num_cols(),
            end: grid.end(),
        }
    }

    /// Headings to try, preferred first
    fn preference(&self) -> [Direction; 4] {
        let h = self.heading;
        match self.side {
            Side::Left => [h.turn_left(), h, h.turn_right(), -h],
            Side::Right => [h.turn_right(), h, h.turn_left(), -h],
        }
    }
}

impl Search for WallFollower {
    fn step(&mut self, grid: &mut Grid) -> Step {
        if self.current == self.end {
            return Step::Found;
        }
        if self.moves >= self.move_limit {
            warn!(
                "wall follower went round in circles for {} moves, giving up",
                self.moves
            );
            return Step::Exhausted;
        }

        let Some((heading, next)) = self
            .preference()
            .into_iter()
            .find_map(|dir| Some((dir, grid.open_neighbor(self.current, dir)?)))
        else {
            return Step::Exhausted;
        };

        self.heading = heading;
        self.current = next;
        self.moves += 1;

        if let Some(cell) = grid.cell_mut(next).filter(|cell| cell.distance == 0) {
            cell.distance = self.next_distance;
            self.next_distance += 1;
        }

        grid.mark(next, CellKind::PathHead);
        self.trail.push_back(next);
        if self.trail.len() > Self::TRAIL_LEN {
            if let Some(old) = self.trail.pop_front() {
                grid.mark(old, CellKind::PathVisited);
            }
        }
        Step::Continue
    }

    fn finish(&mut self, grid: &mut Grid) {
        for p in self.trail.drain(..) {
            grid.mark(p, CellKind::PathVisited);
        }
    }

    /// Walk back from the end, always to the neighbour that was entered first.
    fn trace(&mut self, grid: &mut Grid) -> Option<usize> {
        let start = grid.start();
        let mut current = grid.end();
        let mut length = 1;

        while current != start {
            let best = grid.cell(current)?.distance;
            let lower = Direction::ALL
                .into_iter()
                .filter_map(|dir| grid.open_neighbor(current, dir))
                .filter_map(|n| grid.cell(n).map(|cell| (n, cell.distance)))
                .filter(|&(_, distance)| distance != 0 && distance < best)
                .min_by_key(|&(_, distance)| distance);

            let Some((next, _)) = lower else {
                warn!(
                    "backward walk stuck at ({}, {}) after {} cells",
                    current.row, current.col, length
                );
                return None;
            };
            grid.mark(next, CellKind::PathSolution);
            current = next;
            length += 1;
        }
        Some(length)
    }
}
