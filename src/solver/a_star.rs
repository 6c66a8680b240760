use log::trace;

use super::{Search, Step};
use crate::grid::{CellKind, Direction, Grid, Point};

/// Entry of the open list
#[derive(Debug, Clone, Copy)]
struct Node {
    pos: Point,
    distance: usize,
    /// `distance` plus the manhattan distance to the end
    heuristic: usize,
    parent: Option<Point>,
}

/// A* search with the manhattan distance as heuristic.
///
/// The heuristic never overestimates on a grid without diagonal moves, so the first
/// time the end cell leaves the open list its parent chain is a shortest path.
pub(crate) struct AStarSearch {
    /// Sorted by descending heuristic, the next node to expand is at the back
    open: Vec<Node>,
    closed: Vec<bool>,
    num_cols: usize,
    end: Point,
}

impl AStarSearch {
    pub(crate) fn new(grid: &mut Grid) -> Self {
        let (start, end) = (grid.start(), grid.end());
        let mut search = Self {
            open: Vec::new(),
            closed: vec![false; grid.num_rows() * grid.num_cols()],
            num_cols: grid.num_cols(),
            end,
        };
        search.insert(Node {
            pos: start,
            distance: 1,
            heuristic: 1 + start.manhattan(end),
            parent: None,
        });
        search
    }

    fn index(&self, p: Point) -> usize {
        p.row * self.num_cols + p.col
    }

    /// Insert keeping the list sorted. Among equal heuristics the older node stays
    /// closer to the back, so ties are expanded in insertion order.
    fn insert(&mut self, node: Node) {
        let at = self
            .open
            .partition_point(|other| other.heuristic > node.heuristic);
        self.open.insert(at, node);
    }

    /// An open node for the same cell that is already cheaper
    fn dominated(&self, node: &Node) -> bool {
        self.open
            .iter()
            .any(|other| other.pos == node.pos && other.distance < node.distance)
    }
}

impl Search for AStarSearch {
    fn step(&mut self, grid: &mut Grid) -> Step {
        while let Some(node) = self.open.pop() {
            let i = self.index(node.pos);
            if self.closed[i] {
                continue;
            }
            self.closed[i] = true;

            if let Some(cell) = grid.cell_mut(node.pos) {
                cell.distance = node.distance;
                cell.heuristic = node.heuristic;
                cell.parent = node.parent;
            }
            grid.mark(node.pos, CellKind::PathVisited);

            if node.pos == self.end {
                return Step::Found;
            }

            for dir in Direction::ALL {
                let Some(next) = grid.open_neighbor(node.pos, dir) else {
                    continue;
                };
                if self.closed[self.index(next)] {
                    continue;
                }

                let distance = node.distance + 1;
                let candidate = Node {
                    pos: next,
                    distance,
                    heuristic: distance + next.manhattan(self.end),
                    parent: Some(node.pos),
                };
                if self.dominated(&candidate) {
                    trace!("dropping dominated node {:?}", candidate.pos);
                    continue;
                }
                self.insert(candidate);
                grid.mark(next, CellKind::PathHead);
            }
            return Step::Continue;
        }
        Step::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use std::ops::RangeInclusive;

    use super::*;
    use crate::solver::trace_parents;

    fn open_block(grid: &mut Grid, rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) {
        for row in rows {
            for col in cols.clone() {
                grid.cell_at_mut(row, col).unwrap().kind = CellKind::Empty;
            }
        }
    }

    #[test]
    fn ties_are_expanded_in_insertion_order() {
        let mut grid = Grid::new(21, 21);
        let mut search = AStarSearch::new(&mut grid);
        search.open.clear();

        let node = |col, heuristic| Node {
            pos: Point::new(1, col),
            distance: 1,
            heuristic,
            parent: None,
        };
        search.insert(node(1, 10));
        search.insert(node(2, 8));
        search.insert(node(3, 10));
        search.insert(node(4, 8));

        let order = std::iter::from_fn(|| search.open.pop())
            .map(|n| n.pos.col)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn open_room_takes_a_shortest_route() {
        let mut grid = Grid::new(21, 21);
        open_block(&mut grid, 1..=19, 1..=19);

        let mut search = AStarSearch::new(&mut grid);
        let last = std::iter::repeat_with(|| search.step(&mut grid))
            .find(|step| *step != Step::Continue);
        assert_eq!(last, Some(Step::Found));

        // Manhattan distance from (1, 0) to (19, 20) is 38, so 39 cells
        assert_eq!(trace_parents(&mut grid), Some(39));
        let end = grid.cell_at(19, 20).unwrap();
        assert_eq!(end.distance, 39);
        assert_eq!(end.heuristic, 39);
    }

    #[test]
    fn detour_around_a_wall_is_still_shortest() {
        let mut grid = Grid::new(21, 21);
        open_block(&mut grid, 1..=19, 1..=19);
        // Wall across column 10 with a gap at the top
        for row in 2..=19 {
            grid.cell_at_mut(row, 10).unwrap().kind = CellKind::Wall;
        }

        let mut search = AStarSearch::new(&mut grid);
        while search.step(&mut grid) == Step::Continue {}

        // Right to column 9 at row 1, through the gap, then down and right
        assert_eq!(trace_parents(&mut grid), Some(39));
    }

    #[test]
    fn unreachable_end_runs_dry() {
        let mut grid = Grid::new(21, 21);
        open_block(&mut grid, 1..=5, 1..=5);

        let mut search = AStarSearch::new(&mut grid);
        let last = std::iter::repeat_with(|| search.step(&mut grid))
            .find(|step| *step != Step::Continue);
        assert_eq!(last, Some(Step::Exhausted));
        assert_eq!(grid.count(CellKind::PathVisited), 25);
    }
}
