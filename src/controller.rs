//! The maze a front end talks to: one grid plus at most one solve session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;

use crate::error::MazeError;
use crate::grid::{CellKind, Grid};
use crate::maze_generator::MazeGenerator;
use crate::solver::{
    self, Algorithm, AnimationSpeed, SolveHandle, SolveReport, SolveStatus, StopFlag,
};

/// A carved maze and its solve session.
///
/// The session goes `Idle -> Running -> Solved | NoPath | Canceled`. While it is
/// running the grid may not be re-carved and its endpoints may not move; those calls
/// fail with [`MazeError::Busy`]. A background solve is observed with [`Maze::poll`],
/// which is meant to be called from the caller's own timer or render loop.
pub struct Maze {
    grid: Arc<Mutex<Grid>>,
    generator: MazeGenerator,
    algorithm: Algorithm,
    speed: AnimationSpeed,
    status: SolveStatus,
    worker: Option<SolveHandle>,
    report: Option<SolveReport>,
}

impl Maze {
    /// Carve a new maze.
    ///
    /// `rows` and `cols` are hints: they are clamped to the supported range and made
    /// odd. With a `seed` the maze is reproducible.
    pub fn new(
        rows: usize,
        cols: usize,
        difficult: bool,
        seed: Option<u64>,
    ) -> Result<Self, MazeError> {
        let mut generator = MazeGenerator::new(seed);
        let grid = generator.generate(rows, cols, difficult)?;
        Ok(Maze {
            grid: Arc::new(Mutex::new(grid)),
            generator,
            algorithm: Algorithm::default(),
            speed: AnimationSpeed::default(),
            status: SolveStatus::Idle,
            worker: None,
            report: None,
        })
    }

    /// Carve a fresh maze in place of the current one.
    pub fn regenerate(
        &mut self,
        rows: usize,
        cols: usize,
        difficult: bool,
    ) -> Result<(), MazeError> {
        self.ensure_idle()?;
        let grid = self.generator.generate(rows, cols, difficult)?;
        *self.grid() = grid;
        self.set_status(SolveStatus::Idle);
        self.report = None;
        Ok(())
    }

    /// Move the start cell, see [`Grid::set_start`].
    pub fn set_start(&mut self, row: usize, col: usize) -> Result<(), MazeError> {
        self.ensure_idle()?;
        self.grid().set_start(row, col)
    }

    /// Move the end cell, see [`Grid::set_end`].
    pub fn set_end(&mut self, row: usize, col: usize) -> Result<(), MazeError> {
        self.ensure_idle()?;
        self.grid().set_end(row, col)
    }

    /// Solve on the calling thread.
    ///
    /// A search that finds nothing is not an error here; inspect the report, or turn it
    /// into one with [`SolveReport::into_result`].
    pub fn solve(&mut self, algorithm: Algorithm) -> Result<SolveReport, MazeError> {
        self.ensure_idle()?;
        self.algorithm = algorithm;
        self.set_status(SolveStatus::Running);

        let report = solver::run(&*self.grid, algorithm, &StopFlag::new(), &self.speed);
        self.finish(report.clone());
        Ok(report)
    }

    /// Start solving on a background thread and return at once.
    pub fn solve_async(&mut self, algorithm: Algorithm) -> Result<(), MazeError> {
        self.ensure_idle()?;
        self.algorithm = algorithm;
        self.report = None;
        self.worker = Some(SolveHandle::spawn(
            self.grid.clone(),
            algorithm,
            self.speed.clone(),
        ));
        self.set_status(SolveStatus::Running);
        Ok(())
    }

    /// Non-blocking check on the session.
    ///
    /// Returns `Running` until the background solve ends; the first call after that
    /// collects the worker and returns the terminal status.
    pub fn poll(&mut self) -> SolveStatus {
        if let Some(worker) = self.worker.as_mut() {
            if worker.status().is_terminal() {
                if let Some(report) = self.worker.take().and_then(|w| w.report().cloned()) {
                    self.finish(report);
                }
            }
        }
        self.status
    }

    /// Block until the background solve ends.
    pub fn wait(&mut self) -> SolveStatus {
        if let Some(worker) = self.worker.take() {
            self.finish(worker.join());
        }
        self.status
    }

    /// Stop the background solve and wait until the worker has let go of the grid.
    ///
    /// Does nothing unless a solve is running. A solve that ended on its own before
    /// the stop flag was seen keeps its outcome.
    pub fn cancel(&mut self) -> SolveStatus {
        if let Some(worker) = self.worker.take() {
            debug!("canceling {} solve", worker.algorithm());
            self.finish(worker.cancel());
        }
        self.status
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Report of the last finished solve
    pub fn report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    /// Lock the grid, e.g. for drawing.
    ///
    /// During a background solve the lock is shared with the worker, which takes it
    /// once per step. Hold it briefly.
    pub fn grid(&self) -> MutexGuard<'_, Grid> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Kind of the cell at `(row, col)`, `None` outside the grid
    pub fn cell_kind(&self, row: usize, col: usize) -> Option<CellKind> {
        self.grid().kind_at(row, col)
    }

    pub fn num_rows(&self) -> usize {
        self.grid().num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.grid().num_cols()
    }

    pub fn is_difficult(&self) -> bool {
        self.grid().is_difficult()
    }

    /// Cells on the last solution, both endpoints included
    pub fn path_length(&self) -> Option<usize> {
        self.report.as_ref().and_then(SolveReport::path_length)
    }

    pub fn solve_time(&self) -> Option<Duration> {
        self.report.as_ref().map(|report| report.elapsed)
    }

    /// Algorithm of the current or last solve
    pub fn current_algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn animation_speed(&self) -> u8 {
        self.speed.get()
    }

    /// Takes effect on a running solve from its next step on.
    pub fn set_animation_speed(&self, percent: u8) {
        self.speed.set(percent);
    }

    fn ensure_idle(&mut self) -> Result<(), MazeError> {
        if self.poll().is_running() {
            Err(MazeError::Busy)
        } else {
            Ok(())
        }
    }

    fn finish(&mut self, report: SolveReport) {
        self.set_status(report.status());
        self.report = Some(report);
    }

    fn set_status(&mut self, status: SolveStatus) {
        if status != self.status {
            debug!("solve session {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }
}

impl Drop for Maze {
    fn drop(&mut self) {
        self.cancel();
    }
}
