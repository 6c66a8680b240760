use std::collections::VecDeque;

use super::{Search, Step};
use crate::grid::{CellKind, Direction, Grid, Point};

/// Breadth-first search. Every edge costs one, so the first time the end cell is
/// dequeued its parent chain is a shortest path.
pub(crate) struct BreadthFirst {
    queue: VecDeque<Point>,
    end: Point,
}

impl BreadthFirst {
    pub(crate) fn new(grid: &mut Grid) -> Self {
        let start = grid.start();
        if let Some(cell) = grid.cell_mut(start) {
            cell.distance = 1;
        }
        Self {
            queue: VecDeque::from([start]),
            end: grid.end(),
        }
    }
}

impl Search for BreadthFirst {
    fn step(&mut self, grid: &mut Grid) -> Step {
        let Some(current) = self.queue.pop_front() else {
            return Step::Exhausted;
        };
        if current == self.end {
            return Step::Found;
        }
        grid.mark(current, CellKind::PathVisited);

        let distance = grid.cell(current).map_or(1, |cell| cell.distance);
        for dir in Direction::ALL {
            let Some(next) = grid.open_neighbor(current, dir) else {
                continue;
            };
            if let Some(cell) = grid.cell_mut(next).filter(|cell| cell.distance == 0) {
                cell.distance = distance + 1;
                cell.parent = Some(current);
                self.queue.push_back(next);
                grid.mark(next, CellKind::PathHead);
            }
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::trace_parents;

    /// Row 1 open from the start to column 5, then down column 5 to the end
    fn l_shaped() -> Grid {
        let mut grid = Grid::new(21, 21);
        for col in 1..=5 {
            grid.cell_at_mut(1, col).unwrap().kind = CellKind::Empty;
        }
        for row in 2..=19 {
            grid.cell_at_mut(row, 5).unwrap().kind = CellKind::Empty;
        }
        for col in 6..=19 {
            grid.cell_at_mut(19, col).unwrap().kind = CellKind::Empty;
        }
        grid
    }

    #[test]
    fn distances_grow_one_per_step() {
        let mut grid = l_shaped();
        let mut bfs = BreadthFirst::new(&mut grid);
        let mut steps = 0;
        while bfs.step(&mut grid) == Step::Continue {
            steps += 1;
        }

        assert_eq!(grid.cell_at(1, 0).unwrap().distance, 1);
        assert_eq!(grid.cell_at(1, 5).unwrap().distance, 6);
        assert_eq!(grid.cell_at(19, 5).unwrap().distance, 24);
        assert_eq!(grid.cell_at(19, 20).unwrap().distance, 39);
        assert_eq!(
            grid.cell_at(2, 5).unwrap().parent,
            Some(Point::new(1, 5))
        );
        // One step per cell of the corridor before the end
        assert_eq!(steps, 38);

        assert_eq!(trace_parents(&mut grid), Some(39));
        assert_eq!(grid.kind_at(10, 5), Some(CellKind::PathSolution));
    }

    #[test]
    fn runs_dry_without_a_way_through() {
        let mut grid = l_shaped();
        grid.cell_at_mut(10, 5).unwrap().kind = CellKind::Wall;

        let mut bfs = BreadthFirst::new(&mut grid);
        let last = std::iter::repeat_with(|| bfs.step(&mut grid))
            .find(|step| *step != Step::Continue);
        assert_eq!(last, Some(Step::Exhausted));
        assert_eq!(grid.cell_at(11, 5).unwrap().distance, 0);
    }
}
