//! Maze generation
//!
//! Rooms are the cells with an odd row and an odd column. Randomized backtracking links
//! every room into a spanning tree by carving out the single wall cell between two
//! neighbouring rooms, which gives a perfect maze. Difficult mazes then get extra walls
//! knocked out to create loops.

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::MazeError;
use crate::grid::{CellKind, Direction, Grid, Point};

/// Randomized backtracking maze carver
#[derive(Debug)]
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    /// Give up on finding a removable wall after this many random probes per wall
    const PERTURB_ATTEMPTS: usize = 10_000;

    /// Create a generator; the same seed always carves the same maze.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Allocate a grid of (clamped) size `rows` x `cols` and carve a maze into it.
    pub fn generate(
        &mut self,
        rows: usize,
        cols: usize,
        difficult: bool,
    ) -> Result<Grid, MazeError> {
        let mut grid = Grid::new(rows, cols);
        self.carve(&mut grid, difficult)?;
        Ok(grid)
    }

    /// Carve a fresh maze into `grid`, discarding whatever it held.
    ///
    /// Start is placed at `(1, 0)` and end at `(rows - 2, cols - 1)`.
    pub fn carve(&mut self, grid: &mut Grid, difficult: bool) -> Result<(), MazeError> {
        let (num_rows, num_cols) = (grid.num_rows(), grid.num_cols());

        let mut visited = vec![false; num_rows * num_cols];
        for row in 0..num_rows {
            for col in 0..num_cols {
                if let Some(cell) = grid.cell_at_mut(row, col) {
                    cell.kind = if row % 2 == 1 && col % 2 == 1 {
                        CellKind::Empty
                    } else {
                        CellKind::Wall
                    };
                    cell.distance = 0;
                    cell.heuristic = 0;
                    cell.parent = None;
                }
            }
        }

        let first = Point::new(
            self.random.gen_range(0..num_rows - 2) / 2 * 2 + 1,
            self.random.gen_range(0..num_cols - 2) / 2 * 2 + 1,
        );
        if grid.is_wall_or_oob(first) {
            return Err(MazeError::Construction(format!(
                "first room ({}, {}) is a wall",
                first.row, first.col
            )));
        }
        visited[first.row * num_cols + first.col] = true;

        let mut stack = vec![first];
        while let Some(&current) = stack.last() {
            let rotation = self.random.gen_range(0..4);
            let next = (0..4)
                .map(|i| Direction::ALL[(i + rotation) % 4])
                .filter_map(|dir| Some((dir, current.offset(dir, 2)?)))
                .find(|(_, room)| {
                    room.row < num_rows
                        && room.col < num_cols
                        && !visited[room.row * num_cols + room.col]
                });

            match next {
                Some((dir, room)) => {
                    let wall = current.offset(dir, 1).ok_or_else(|| {
                        MazeError::Construction(format!(
                            "no wall between ({}, {}) and ({}, {})",
                            current.row, current.col, room.row, room.col
                        ))
                    })?;
                    grid.cell_mut(wall)
                        .ok_or(MazeError::OutOfBounds {
                            row: wall.row,
                            col: wall.col,
                        })?
                        .kind = CellKind::Empty;
                    visited[room.row * num_cols + room.col] = true;
                    stack.push(room);
                }
                None => {
                    stack.pop();
                }
            }
        }

        grid.place_endpoints(Point::new(1, 0), Point::new(num_rows - 2, num_cols - 1));
        grid.set_difficult(difficult);

        if difficult {
            self.perturb(grid);
        }

        info!(
            "carved {}x{} maze (difficult: {})",
            num_rows, num_cols, difficult
        );
        Ok(())
    }

    /// Knock out `max(rows, cols)` walls to add loops.
    ///
    /// Only walls that separate two passages are removed: both vertical neighbours are
    /// walls and neither horizontal one is, or the other way round. Wall ends and the
    /// stems of T junctions are skipped so the maze keeps its corridor shape.
    fn perturb(&mut self, grid: &mut Grid) {
        let (num_rows, num_cols) = (grid.num_rows(), grid.num_cols());
        let wall_count = num_rows.max(num_cols);

        for removed in 0..wall_count {
            let found = (0..Self::PERTURB_ATTEMPTS).find_map(|_| {
                let p = Point::new(
                    self.random.gen_range(1..num_rows - 1),
                    self.random.gen_range(1..num_cols - 1),
                );
                Self::separates_passages(grid, p).then_some(p)
            });

            match found {
                Some(p) => {
                    if let Some(cell) = grid.cell_mut(p) {
                        cell.kind = CellKind::Empty;
                    }
                }
                None => {
                    warn!(
                        "no removable wall found, stopping after {} of {}",
                        removed, wall_count
                    );
                    return;
                }
            }
        }
        debug!("removed {} extra walls", wall_count);
    }

    fn separates_passages(grid: &Grid, p: Point) -> bool {
        if !grid.is_wall_or_oob(p) {
            return false;
        }
        let wall_towards = |dir: Direction| {
            grid.neighbor(p, dir)
                .map_or(true, |n| grid.is_wall_or_oob(n))
        };

        let vertical = [Direction::North, Direction::South]
            .into_iter()
            .filter(|&dir| wall_towards(dir))
            .count();
        if vertical == 1 {
            return false;
        }
        let horizontal = [Direction::West, Direction::East]
            .into_iter()
            .filter(|&dir| wall_towards(dir))
            .count();

        vertical + horizontal == 2
    }
}
