//! Rectangular grid of maze cells
//!
//! The grid is the arena for everything the engine does: carving writes cell kinds into
//! it, and every search stores its bookkeeping (distance, heuristic and parent link)
//! directly in the cells. Parent links are coordinates, never references.

use std::fmt;
use std::ops::Neg;

use itertools::Itertools;

use crate::error::MazeError;

pub const MIN_ROWS: usize = 21;
pub const MIN_COLS: usize = 21;
pub const MAX_ROWS: usize = 499;
pub const MAX_COLS: usize = 499;

/// Location in the grid
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Point { row, col }
    }

    /// Manhattan distance, the number of orthogonal steps between two points.
    pub fn manhattan(self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Point `steps` cells away towards `dir`.
    ///
    /// Returns `None` if the move would leave the grid through the top or left edge;
    /// the bottom and right edges are checked by the grid.
    pub fn offset(self, dir: Direction, steps: usize) -> Option<Point> {
        let (d_row, d_col) = dir.delta();
        let steps = steps as isize;
        Some(Point {
            row: self.row.checked_add_signed(d_row * steps)?,
            col: self.col.checked_add_signed(d_col * steps)?,
        })
    }
}

/// Compass heading on the grid, rows grow southwards
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// (row, col) change of a single step
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Self::Output {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// What a cell currently shows
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Start,
    End,
    /// Frontier of a running search
    PathHead,
    /// Finalized by a search
    PathVisited,
    /// Part of the reported solution
    PathSolution,
}

impl CellKind {
    /// Character used by the text rendering of the grid
    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Wall => 'X',
            CellKind::Start => 'S',
            CellKind::End => 'E',
            CellKind::PathHead => '+',
            CellKind::PathVisited => '.',
            CellKind::PathSolution => 'O',
        }
    }
}

/// One grid position together with the working state of the current search
#[derive(Clone, Debug)]
pub struct Cell {
    row: usize,
    col: usize,
    pub kind: CellKind,
    /// Cost from the start cell, zero while unreached
    pub distance: usize,
    /// Estimated total cost, only written by A*
    pub heuristic: usize,
    /// Where the search came from, used to trace the solution back
    pub parent: Option<Point>,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            kind: CellKind::Wall,
            distance: 0,
            heuristic: 0,
            parent: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn pos(&self) -> Point {
        Point::new(self.row, self.col)
    }

    pub fn is_wall(&self) -> bool {
        self.kind == CellKind::Wall
    }

    fn clear_search_state(&mut self) {
        self.distance = 0;
        self.heuristic = 0;
        self.parent = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

/// Maze board owning all of its cells
#[derive(Clone, Debug)]
pub struct Grid {
    num_rows: usize,
    num_cols: usize,
    cells: Vec<Cell>,
    start: Point,
    end: Point,
    difficult: bool,
}

/// Clamp a requested dimension into `[min, max]` and make it odd.
fn clamp_dimension(requested: usize, min: usize, max: usize) -> usize {
    if requested < min {
        min
    } else if requested > max {
        max
    } else if requested % 2 == 0 {
        requested + 1
    } else {
        requested
    }
}

impl Grid {
    /// Allocate a grid of solid walls with the default start and end openings.
    ///
    /// `rows` and `cols` are hints: both are clamped into
    /// [`MIN_ROWS`]..=[`MAX_ROWS`] (resp. columns) and even values are bumped to the
    /// next odd one.
    ///
    /// ```
    /// use maze_solver::grid::Grid;
    ///
    /// let grid = Grid::new(10, 40);
    /// assert_eq!((grid.num_rows(), grid.num_cols()), (21, 41));
    /// ```
    pub fn new(rows: usize, cols: usize) -> Self {
        let num_rows = clamp_dimension(rows, MIN_ROWS, MAX_ROWS);
        let num_cols = clamp_dimension(cols, MIN_COLS, MAX_COLS);

        let cells = (0..num_rows)
            .cartesian_product(0..num_cols)
            .map(|(row, col)| Cell::new(row, col))
            .collect();

        let mut grid = Grid {
            num_rows,
            num_cols,
            cells,
            start: Point::new(1, 0),
            end: Point::new(num_rows - 2, num_cols - 1),
            difficult: false,
        };
        grid.tag_endpoints();
        grid
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Whether extra loops were knocked into the maze after carving
    pub fn is_difficult(&self) -> bool {
        self.difficult
    }

    pub(crate) fn set_difficult(&mut self, difficult: bool) {
        self.difficult = difficult;
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.num_rows && col < self.num_cols).then(|| row * self.num_cols + col)
    }

    /// Cell at `(row, col)`, or `None` outside the grid.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.index(row, col).map(|i| &mut self.cells[i])
    }

    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.cell_at(p.row, p.col)
    }

    pub fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        self.cell_at_mut(p.row, p.col)
    }

    /// Kind of the cell at `(row, col)`, `None` outside the grid.
    pub fn kind_at(&self, row: usize, col: usize) -> Option<CellKind> {
        self.cell_at(row, col).map(|cell| cell.kind)
    }

    /// Wall test used while carving: anything outside the grid counts as a wall.
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.cell_at(row, col).map_or(true, Cell::is_wall)
    }

    /// Same as [`Grid::is_wall`], for a point.
    pub fn is_wall_or_oob(&self, p: Point) -> bool {
        self.is_wall(p.row, p.col)
    }

    /// Passability test used while searching: outside the grid is never a candidate.
    pub fn in_bounds_and_open(&self, p: Point) -> bool {
        self.cell(p).map_or(false, |cell| !cell.is_wall())
    }

    /// Orthogonal neighbour of `p`, if it lies inside the grid.
    pub fn neighbor(&self, p: Point, dir: Direction) -> Option<Point> {
        p.offset(dir, 1)
            .filter(|n| n.row < self.num_rows && n.col < self.num_cols)
    }

    /// Neighbour of `p` towards `dir`, if it is inside the grid and not a wall.
    pub fn open_neighbor(&self, p: Point, dir: Direction) -> Option<Point> {
        self.neighbor(p, dir).filter(|n| self.in_bounds_and_open(*n))
    }

    /// Open orthogonal neighbours, in north, east, south, west order.
    pub fn open_neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.open_neighbor(p, dir))
    }

    /// Cell on the outer boundary row or column
    pub fn is_perimeter(&self, p: Point) -> bool {
        p.row == 0 || p.col == 0 || p.row + 1 == self.num_rows || p.col + 1 == self.num_cols
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    /// Wipe all search state so a new solve starts from a clean board.
    ///
    /// Walls are left untouched; every other cell becomes `Empty` apart from the start
    /// and end cells.
    pub fn reset_for_solve(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| !cell.is_wall()) {
            cell.kind = CellKind::Empty;
            cell.clear_search_state();
        }
        self.tag_endpoints();
    }

    /// Tag a cell for display. Endpoints and walls keep their kind.
    pub(crate) fn mark(&mut self, p: Point, kind: CellKind) {
        if let Some(cell) = self.cell_mut(p) {
            if !matches!(cell.kind, CellKind::Start | CellKind::End | CellKind::Wall) {
                cell.kind = kind;
            }
        }
    }

    /// Move the start cell.
    ///
    /// The target must be an open cell, or a perimeter wall next to an open cell (this
    /// pokes a new opening in the outer wall). The previous start becomes a wall again
    /// if it sat on the perimeter.
    pub fn set_start(&mut self, row: usize, col: usize) -> Result<(), MazeError> {
        self.relocate(Endpoint::Start, Point::new(row, col))
    }

    /// Move the end cell, see [`Grid::set_start`].
    pub fn set_end(&mut self, row: usize, col: usize) -> Result<(), MazeError> {
        self.relocate(Endpoint::End, Point::new(row, col))
    }

    fn relocate(&mut self, endpoint: Endpoint, target: Point) -> Result<(), MazeError> {
        let invalid = MazeError::InvalidEndpoint {
            row: target.row,
            col: target.col,
        };
        let kind = self
            .cell(target)
            .ok_or(MazeError::OutOfBounds {
                row: target.row,
                col: target.col,
            })?
            .kind;

        let (current, other) = match endpoint {
            Endpoint::Start => (self.start, self.end),
            Endpoint::End => (self.end, self.start),
        };
        if target == current {
            return Ok(());
        }
        if target == other {
            return Err(invalid);
        }
        if kind == CellKind::Wall
            && !(self.is_perimeter(target) && self.open_neighbors(target).next().is_some())
        {
            return Err(invalid);
        }

        let revert = if self.is_perimeter(current) {
            CellKind::Wall
        } else {
            CellKind::Empty
        };
        if let Some(cell) = self.cell_mut(current) {
            cell.kind = revert;
            cell.clear_search_state();
        }

        match endpoint {
            Endpoint::Start => self.start = target,
            Endpoint::End => self.end = target,
        }
        self.tag_endpoints();
        Ok(())
    }

    /// Place both endpoints at once, used after carving.
    pub(crate) fn place_endpoints(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
        self.tag_endpoints();
    }

    fn tag_endpoints(&mut self) {
        let (start, end) = (self.start, self.end);
        if let Some(cell) = self.cell_mut(start) {
            cell.kind = CellKind::Start;
        }
        if let Some(cell) = self.cell_mut(end) {
            cell.kind = CellKind::End;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .cells
            .chunks(self.num_cols)
            .map(|row| row.iter().map(|cell| cell.kind.symbol()).collect::<String>())
            .join("\n");
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open a horizontal corridor along row 1 from column 1 to `to_col`.
    fn open_corridor(grid: &mut Grid, to_col: usize) {
        for col in 1..=to_col {
            grid.cell_at_mut(1, col).unwrap().kind = CellKind::Empty;
        }
    }

    #[test]
    fn dimensions_are_clamped_and_odd() {
        let grid = Grid::new(10, 10);
        assert_eq!((grid.num_rows(), grid.num_cols()), (21, 21));

        let grid = Grid::new(600, 22);
        assert_eq!((grid.num_rows(), grid.num_cols()), (499, 23));

        let grid = Grid::new(0, 499);
        assert_eq!((grid.num_rows(), grid.num_cols()), (21, 499));

        let grid = Grid::new(498, 35);
        assert_eq!((grid.num_rows(), grid.num_cols()), (499, 35));
    }

    #[test]
    fn new_grid_has_single_start_and_end() {
        let grid = Grid::new(31, 45);
        assert_eq!(grid.count(CellKind::Start), 1);
        assert_eq!(grid.count(CellKind::End), 1);
        assert_eq!(grid.start(), Point::new(1, 0));
        assert_eq!(grid.end(), Point::new(29, 44));
        assert_eq!(grid.cells().len(), 31 * 45);
        assert!(grid
            .cells()
            .iter()
            .all(|cell| grid.cell_at(cell.row(), cell.col()).unwrap().pos() == cell.pos()));
    }

    #[test]
    fn out_of_bounds_lookups_are_safe() {
        let grid = Grid::new(21, 21);
        assert!(grid.cell_at(21, 0).is_none());
        assert!(grid.cell_at(0, 21).is_none());
        assert!(grid.cell_at(usize::MAX, usize::MAX).is_none());
        assert!(grid.kind_at(100, 3).is_none());

        assert!(grid.is_wall(21, 5));
        assert!(!grid.in_bounds_and_open(Point::new(21, 5)));
        assert!(grid.neighbor(Point::new(0, 0), Direction::North).is_none());
        assert!(grid.neighbor(Point::new(0, 0), Direction::West).is_none());
        assert!(grid.neighbor(Point::new(20, 20), Direction::South).is_none());
        assert_eq!(
            grid.neighbor(Point::new(0, 0), Direction::East),
            Some(Point::new(0, 1))
        );
    }

    #[test]
    fn wall_and_open_predicates_differ_only_outside() {
        let mut grid = Grid::new(21, 21);
        open_corridor(&mut grid, 3);
        let inside = Point::new(1, 2);
        assert!(!grid.is_wall_or_oob(inside));
        assert!(grid.in_bounds_and_open(inside));

        let wall = Point::new(2, 2);
        assert!(grid.is_wall_or_oob(wall));
        assert!(!grid.in_bounds_and_open(wall));
    }

    #[test]
    fn reset_for_solve_is_idempotent() {
        let mut grid = Grid::new(21, 21);
        open_corridor(&mut grid, 5);
        {
            let cell = grid.cell_at_mut(1, 3).unwrap();
            cell.kind = CellKind::PathSolution;
            cell.distance = 7;
            cell.heuristic = 12;
            cell.parent = Some(Point::new(1, 2));
        }

        grid.reset_for_solve();
        let once = grid.clone();
        grid.reset_for_solve();

        for (a, b) in once.cells().iter().zip(grid.cells()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.distance, b.distance);
            assert_eq!(a.heuristic, b.heuristic);
            assert_eq!(a.parent, b.parent);
        }
        let cell = grid.cell_at(1, 3).unwrap();
        assert_eq!(cell.kind, CellKind::Empty);
        assert_eq!((cell.distance, cell.heuristic, cell.parent), (0, 0, None));
        assert_eq!(grid.kind_at(1, 0), Some(CellKind::Start));
        assert_eq!(grid.kind_at(19, 20), Some(CellKind::End));
    }

    #[test]
    fn mark_leaves_endpoints_and_walls() {
        let mut grid = Grid::new(21, 21);
        open_corridor(&mut grid, 2);
        grid.mark(grid.start(), CellKind::PathSolution);
        grid.mark(Point::new(5, 5), CellKind::PathVisited);
        grid.mark(Point::new(1, 1), CellKind::PathHead);

        assert_eq!(grid.kind_at(1, 0), Some(CellKind::Start));
        assert_eq!(grid.kind_at(5, 5), Some(CellKind::Wall));
        assert_eq!(grid.kind_at(1, 1), Some(CellKind::PathHead));
    }

    #[test]
    fn set_start_rejects_inner_wall() {
        let mut grid = Grid::new(21, 21);
        assert_eq!(
            grid.set_start(5, 5),
            Err(MazeError::InvalidEndpoint { row: 5, col: 5 })
        );
        assert_eq!(grid.start(), Point::new(1, 0));
        assert_eq!(grid.kind_at(1, 0), Some(CellKind::Start));
    }

    #[test]
    fn set_start_rejects_closed_perimeter_wall() {
        let mut grid = Grid::new(21, 21);
        assert!(grid.set_start(0, 7).is_err());
        assert_eq!(
            grid.set_start(30, 7),
            Err(MazeError::OutOfBounds { row: 30, col: 7 })
        );
        assert_eq!(grid.start(), Point::new(1, 0));
    }

    #[test]
    fn set_start_on_open_cell_reverts_old_perimeter_start() {
        let mut grid = Grid::new(21, 21);
        open_corridor(&mut grid, 4);

        grid.set_start(1, 3).unwrap();
        assert_eq!(grid.start(), Point::new(1, 3));
        assert_eq!(grid.kind_at(1, 3), Some(CellKind::Start));
        assert_eq!(grid.kind_at(1, 0), Some(CellKind::Wall));

        // Moving away from an inner cell leaves it open
        grid.set_start(1, 1).unwrap();
        assert_eq!(grid.kind_at(1, 3), Some(CellKind::Empty));
        assert_eq!(grid.count(CellKind::Start), 1);
    }

    #[test]
    fn perimeter_wall_next_to_passage_can_be_opened() {
        let mut grid = Grid::new(21, 21);
        open_corridor(&mut grid, 4);

        grid.set_end(0, 4).unwrap();
        assert_eq!(grid.end(), Point::new(0, 4));
        assert_eq!(grid.kind_at(0, 4), Some(CellKind::End));
        assert_eq!(grid.kind_at(19, 20), Some(CellKind::Wall));
        assert_eq!(grid.count(CellKind::End), 1);
    }

    #[test]
    fn endpoints_cannot_overlap() {
        let mut grid = Grid::new(21, 21);
        assert_eq!(
            grid.set_end(1, 0),
            Err(MazeError::InvalidEndpoint { row: 1, col: 0 })
        );
        assert!(grid.set_start(1, 0).is_ok());
    }

    #[test]
    fn display_renders_rows() {
        let mut grid = Grid::new(21, 23);
        open_corridor(&mut grid, 2);
        let text = grid.to_string();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 21);
        assert!(lines.iter().all(|line| line.chars().count() == 23));
        assert_eq!(lines[0], "X".repeat(23));
        assert!(lines[1].starts_with("S  X"));
        assert!(lines[19].ends_with('E'));
    }

    #[test]
    fn direction_turns_are_consistent() {
        for dir in Direction::ALL {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.turn_right().turn_right(), -dir);
            assert_eq!(-(-dir), dir);
        }
        assert_eq!(Point::new(3, 4).manhattan(Point::new(1, 9)), 7);
        assert_eq!(Point::new(1, 1).offset(Direction::North, 2), None);
        assert_eq!(
            Point::new(1, 1).offset(Direction::South, 2),
            Some(Point::new(3, 1))
        );
    }
}
