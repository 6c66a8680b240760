use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, TryRecvError};
use log::{debug, error};

use super::{run, Algorithm, AnimationSpeed, SolveOutcome, SolveReport, SolveStatus, StopFlag};
use crate::grid::Grid;

/// A solve running on a background thread.
///
/// Poll it with [`SolveHandle::status`] from a timer or render loop, or block on
/// [`SolveHandle::join`]. [`SolveHandle::cancel`] raises the stop flag and waits until
/// the worker has let go of the grid. Dropping the handle cancels the solve.
pub struct SolveHandle {
    algorithm: Algorithm,
    stop: StopFlag,
    done: Receiver<SolveReport>,
    thread: Option<JoinHandle<()>>,
    report: Option<SolveReport>,
}

impl SolveHandle {
    /// Start solving `grid` with `algorithm` on a new thread.
    ///
    /// The worker only locks the grid for one search step at a time.
    pub fn spawn(grid: Arc<Mutex<Grid>>, algorithm: Algorithm, speed: AnimationSpeed) -> Self {
        let stop = StopFlag::new();
        let (sender, done) = bounded(1);

        let worker_stop = stop.clone();
        let thread = thread::spawn(move || {
            let report = run(&*grid, algorithm, &worker_stop, &speed);
            // Nobody is listening any more if the handle was dropped
            let _ = sender.send(report);
        });
        debug!("spawned {} worker", algorithm);

        SolveHandle {
            algorithm,
            stop,
            done,
            thread: Some(thread),
            report: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Non-blocking peek at the solve.
    ///
    /// Once a terminal status has been seen the worker thread has been joined.
    pub fn status(&mut self) -> SolveStatus {
        if self.report.is_none() {
            match self.done.try_recv() {
                Ok(report) => self.collect(report),
                Err(TryRecvError::Empty) => return SolveStatus::Running,
                Err(TryRecvError::Disconnected) => self.collect_lost(),
            }
        }
        self.report
            .as_ref()
            .map_or(SolveStatus::Running, SolveReport::status)
    }

    /// The report, once the solve has ended
    pub fn report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    /// Block until the solve ends.
    pub fn join(mut self) -> SolveReport {
        self.wait()
    }

    /// Ask the worker to stop and wait for it.
    ///
    /// The search finishes the step it is in, so this returns after at most one step
    /// and one animation pause. A solve that already ended keeps its outcome.
    pub fn cancel(mut self) -> SolveReport {
        self.stop.stop();
        self.wait()
    }

    fn wait(&mut self) -> SolveReport {
        if self.report.is_none() {
            match self.done.recv() {
                Ok(report) => self.collect(report),
                Err(_) => self.collect_lost(),
            }
        }
        self.report.clone().unwrap_or_else(|| self.lost_report())
    }

    fn collect(&mut self, report: SolveReport) {
        self.join_thread();
        self.report = Some(report);
    }

    /// The worker went away without reporting, which only happens if it panicked
    fn collect_lost(&mut self) {
        self.join_thread();
        error!("{} worker exited without a report", self.algorithm);
        self.report = Some(self.lost_report());
    }

    fn lost_report(&self) -> SolveReport {
        SolveReport {
            algorithm: self.algorithm,
            outcome: SolveOutcome::Canceled,
            steps: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn join_thread(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("{} worker panicked", self.algorithm);
            }
        }
    }
}

impl Drop for SolveHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop.stop();
            self.join_thread();
        }
    }
}
