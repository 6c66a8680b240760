//! Error type shared by the maze engine

use thiserror::Error;

/// Everything that can go wrong while building or solving a maze
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// The grid could not be carved; discard it and try again.
    #[error("maze construction failed: {0}")]
    Construction(String),

    /// A solve is running on this maze. Cancel it or wait for it to finish.
    #[error("a solve is already running")]
    Busy,

    /// The search ran out of cells before reaching the end cell.
    #[error("no path found")]
    NoPath,

    /// The search observed the stop flag.
    #[error("solve canceled")]
    Canceled,

    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },

    /// Endpoints may only sit on open cells, or on perimeter walls next to an open cell.
    #[error("cell ({row}, {col}) cannot hold a start or end")]
    InvalidEndpoint { row: usize, col: usize },

    #[error("unknown solver algorithm `{0}`")]
    UnknownAlgorithm(String),
}
