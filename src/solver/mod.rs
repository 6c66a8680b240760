//! Maze solving
//!
//! Every algorithm is a `Search` that advances one cell per step and keeps its
//! bookkeeping in the grid cells. `run` drives a search to completion, checking
//! the stop flag and pausing for the animation between steps. The grid lock is only
//! held for the duration of a single step, so a renderer can read the board while a
//! background solve is running.

mod a_star;
mod bfs;
mod dfs;
mod wall_follower;
mod worker;

use std::borrow::BorrowMut;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::MazeError;
use crate::grid::{CellKind, Grid};

pub use worker::SolveHandle;

/// Pause between two steps at animation speed 0
pub const MAX_STEP_DELAY: Duration = Duration::from_millis(50);

/// Available solver algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Breadth-first search, shortest path
    Bfs,
    /// Depth-first search, some path
    Dfs,
    /// A* with the manhattan distance, shortest path
    #[default]
    AStar,
    /// Follow the wall on the left hand side
    TurnLeft,
    /// Follow the wall on the right hand side
    TurnRight,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::AStar,
        Algorithm::TurnLeft,
        Algorithm::TurnRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::AStar => "a-star",
            Algorithm::TurnLeft => "turn-left",
            Algorithm::TurnRight => "turn-right",
        }
    }

    /// Set up the search on a freshly reset grid.
    fn search(self, grid: &mut Grid) -> Box<dyn Search> {
        match self {
            Algorithm::Bfs => Box::new(bfs::BreadthFirst::new(grid)),
            Algorithm::Dfs => Box::new(dfs::DepthFirst::new(grid)),
            Algorithm::AStar => Box::new(a_star::AStarSearch::new(grid)),
            Algorithm::TurnLeft => Box::new(wall_follower::WallFollower::new(
                grid,
                wall_follower::Side::Left,
            )),
            Algorithm::TurnRight => Box::new(wall_follower::WallFollower::new(
                grid,
                wall_follower::Side::Right,
            )),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(&['_', ' '][..], "-");
        match wanted.as_str() {
            "astar" => Ok(Algorithm::AStar),
            name => Algorithm::ALL
                .into_iter()
                .find(|algorithm| algorithm.name() == name)
                .ok_or_else(|| MazeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Numeric selector, in the order of [`Algorithm::ALL`]
impl TryFrom<usize> for Algorithm {
    type Error = MazeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Algorithm::ALL
            .get(value)
            .copied()
            .ok_or_else(|| MazeError::UnknownAlgorithm(value.to_string()))
    }
}

/// Result of advancing a search by one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    /// The end cell has been reached
    Found,
    /// Nothing left to explore
    Exhausted,
}

pub(crate) trait Search {
    fn step(&mut self, grid: &mut Grid) -> Step;

    /// Called once when the search stops, whatever the reason.
    fn finish(&mut self, _grid: &mut Grid) {}

    /// Tag the solution after [`Step::Found`] and return its length in cells,
    /// both endpoints included.
    fn trace(&mut self, grid: &mut Grid) -> Option<usize> {
        trace_parents(grid)
    }
}

/// Follow parent links from the end cell back to the start cell.
pub(crate) fn trace_parents(grid: &mut Grid) -> Option<usize> {
    let start = grid.start();
    let mut current = grid.end();
    let mut length = 1;
    let limit = grid.num_rows() * grid.num_cols();

    while current != start {
        let parent = grid.cell(current)?.parent?;
        grid.mark(parent, CellKind::PathSolution);
        current = parent;
        length += 1;
        if length > limit {
            return None;
        }
    }
    Some(length)
}

/// Cooperative cancellation flag shared between a caller and a running solve
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Animation speed in percent, shared with running solves.
///
/// 0 is the slowest speed, 100 removes the pause between steps.
#[derive(Clone, Debug)]
pub struct AnimationSpeed(Arc<AtomicU8>);

impl AnimationSpeed {
    pub fn new(percent: u8) -> Self {
        AnimationSpeed(Arc::new(AtomicU8::new(percent.min(100))))
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Values above 100 are clamped.
    pub fn set(&self, percent: u8) {
        self.0.store(percent.min(100), Ordering::Relaxed);
    }

    pub fn step_delay(&self) -> Duration {
        MAX_STEP_DELAY * u32::from(100 - self.get()) / 100
    }

    fn pause(&self) {
        let delay = self.step_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        AnimationSpeed::new(100)
    }
}

/// How a solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved { path_length: usize },
    NoPath,
    Canceled,
}

/// State of the solve session of a maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveStatus {
    #[default]
    Idle,
    Running,
    Solved,
    NoPath,
    Canceled,
}

impl SolveStatus {
    pub fn is_running(self) -> bool {
        self == SolveStatus::Running
    }

    /// The session has ended and will not change until the next solve
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SolveStatus::Solved | SolveStatus::NoPath | SolveStatus::Canceled
        )
    }
}

impl From<SolveOutcome> for SolveStatus {
    fn from(outcome: SolveOutcome) -> Self {
        match outcome {
            SolveOutcome::Solved { .. } => SolveStatus::Solved,
            SolveOutcome::NoPath => SolveStatus::NoPath,
            SolveOutcome::Canceled => SolveStatus::Canceled,
        }
    }
}

/// Summary of one solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub algorithm: Algorithm,
    pub outcome: SolveOutcome,
    /// Number of search steps taken
    pub steps: usize,
    pub elapsed: Duration,
}

impl SolveReport {
    pub fn path_length(&self) -> Option<usize> {
        match self.outcome {
            SolveOutcome::Solved { path_length } => Some(path_length),
            _ => None,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.outcome.into()
    }

    /// Turn unsuccessful outcomes into errors.
    pub fn into_result(self) -> Result<Self, MazeError> {
        match self.outcome {
            SolveOutcome::Solved { .. } => Ok(self),
            SolveOutcome::NoPath => Err(MazeError::NoPath),
            SolveOutcome::Canceled => Err(MazeError::Canceled),
        }
    }

    /// Print report
    pub fn print_report(&self) {
        match self.outcome {
            SolveOutcome::Solved { path_length } => println!(
                "{}: path length {} found in {:.3}s ({} steps)",
                self.algorithm,
                path_length,
                self.elapsed.as_secs_f64(),
                self.steps
            ),
            SolveOutcome::NoPath => println!(
                "{}: no path found after {} steps",
                self.algorithm, self.steps
            ),
            SolveOutcome::Canceled => println!(
                "{}: canceled after {} steps",
                self.algorithm, self.steps
            ),
        }
    }
}

/// Solve `grid` on the calling thread.
///
/// The board is reset first, so any previous solution disappears.
pub fn solve(
    grid: &mut Grid,
    algorithm: Algorithm,
    stop: &StopFlag,
    speed: &AnimationSpeed,
) -> SolveReport {
    run(&Mutex::new(grid), algorithm, stop, speed)
}

fn with_grid<G, R>(grid: &Mutex<G>, f: impl FnOnce(&mut Grid) -> R) -> R
where
    G: BorrowMut<Grid>,
{
    let mut guard = grid.lock().unwrap_or_else(PoisonError::into_inner);
    f(BorrowMut::<Grid>::borrow_mut(&mut *guard))
}

/// Drive a search over a shared grid until it finds the end, runs dry or is stopped.
pub(crate) fn run<G>(
    grid: &Mutex<G>,
    algorithm: Algorithm,
    stop: &StopFlag,
    speed: &AnimationSpeed,
) -> SolveReport
where
    G: BorrowMut<Grid>,
{
    let started = Instant::now();
    debug!("starting {} solve", algorithm);

    let mut search = with_grid(grid, |grid| {
        grid.reset_for_solve();
        algorithm.search(grid)
    });

    let mut steps = 0;
    let outcome = loop {
        if stop.is_stopped() {
            with_grid(grid, |grid| search.finish(grid));
            break SolveOutcome::Canceled;
        }

        let step = with_grid(grid, |grid| search.step(grid));
        steps += 1;
        match step {
            Step::Continue => speed.pause(),
            Step::Found => {
                break with_grid(grid, |grid| {
                    search.finish(grid);
                    match search.trace(grid) {
                        Some(path_length) => SolveOutcome::Solved { path_length },
                        None => SolveOutcome::NoPath,
                    }
                });
            }
            Step::Exhausted => {
                with_grid(grid, |grid| search.finish(grid));
                break SolveOutcome::NoPath;
            }
        }
    };

    let report = SolveReport {
        algorithm,
        outcome,
        steps,
        elapsed: started.elapsed(),
    };
    info!(
        "{} finished: {:?} in {:?} ({} steps)",
        algorithm, report.outcome, report.elapsed, report.steps
    );
    report
}
