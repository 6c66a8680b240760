use super::{Search, Step};
use crate::grid::{CellKind, Direction, Grid, Point};

/// Depth-first search. Finds a path, not necessarily the shortest one.
///
/// Neighbours are pushed whether or not they were seen before; a cell is only
/// finalized the first time it is popped.
pub(crate) struct DepthFirst {
    /// Cells to visit, with the cell they were discovered from
    stack: Vec<(Point, Option<Point>)>,
    end: Point,
}

impl DepthFirst {
    pub(crate) fn new(grid: &mut Grid) -> Self {
        Self {
            stack: vec![(grid.start(), None)],
            end: grid.end(),
        }
    }
}

impl Search for DepthFirst {
    fn step(&mut self, grid: &mut Grid) -> Step {
        while let Some((current, parent)) = self.stack.pop() {
            if grid.cell(current).map_or(true, |cell| cell.distance != 0) {
                continue;
            }

            let distance = parent
                .and_then(|p| grid.cell(p))
                .map_or(1, |cell| cell.distance + 1);
            if let Some(cell) = grid.cell_mut(current) {
                cell.distance = distance;
                cell.parent = parent;
            }
            grid.mark(current, CellKind::PathVisited);

            if current == self.end {
                return Step::Found;
            }

            for dir in Direction::ALL {
                if let Some(next) = grid.open_neighbor(current, dir) {
                    self.stack.push((next, Some(current)));
                    if grid.cell(next).map_or(false, |cell| cell.distance == 0) {
                        grid.mark(next, CellKind::PathHead);
                    }
                }
            }
            return Step::Continue;
        }
        Step::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::trace_parents;

    #[test]
    fn follows_a_branch_to_the_end() {
        // A T junction at (1, 5): up is a dead end, down leads to the end
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
        for col in 6..=9 {
            grid.cell_at_mut(1, col).unwrap().kind = CellKind::Empty;
        }

        let mut dfs = DepthFirst::new(&mut grid);
        let last = std::iter::repeat_with(|| dfs.step(&mut grid))
            .find(|step| *step != Step::Continue);
        assert_eq!(last, Some(Step::Found));

        assert_eq!(trace_parents(&mut grid), Some(39));
        assert_eq!(grid.cell_at(19, 20).unwrap().distance, 39);
        assert_ne!(grid.kind_at(1, 7), Some(CellKind::PathSolution));
    }

    #[test]
    fn finalized_cells_are_never_revisited() {
        let mut grid = Grid::new(21, 21);
        // A 3x3 open block next to the start, no way to the end
        for row in 1..=3 {
            for col in 1..=3 {
                grid.cell_at_mut(row, col).unwrap().kind = CellKind::Empty;
            }
        }

        let mut dfs = DepthFirst::new(&mut grid);
        let mut continues = 0;
        while dfs.step(&mut grid) == Step::Continue {
            continues += 1;
        }
        // Start plus the nine block cells, each finalized once
        assert_eq!(continues, 10);
        assert_eq!(grid.count(CellKind::PathVisited), 9);
        for row in 1..=3 {
            for col in 1..=3 {
                let cell = grid.cell_at(row, col).unwrap();
                assert!(cell.distance >= 2);
                assert!(cell.parent.is_some());
            }
        }
    }
}
