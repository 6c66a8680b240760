//! Carve grid mazes and watch them being solved
//!
//! A maze is a [`Grid`] of odd dimensions where rooms sit on odd/odd cells. The
//! [`MazeGenerator`] carves a perfect maze into it, optionally knocking out extra walls
//! so that several routes lead from start to end. Five [`Algorithm`]s can solve it,
//! each leaving its visited cells and the final path tagged on the grid.
//!
//! # Examples
//! ## Solving on the calling thread
//! ```
//! use maze_solver::{Algorithm, Maze, SolveStatus};
//!
//! let mut maze = Maze::new(21, 21, false, Some(2024)).unwrap();
//! let bfs = maze.solve(Algorithm::Bfs).unwrap();
//! let a_star = maze.solve(Algorithm::AStar).unwrap();
//!
//! assert_eq!(maze.status(), SolveStatus::Solved);
//! assert_eq!(bfs.path_length(), a_star.path_length());
//! a_star.print_report();
//! println!("{}", *maze.grid());
//! ```
//!
//! ## Solving in the background
//! ```
//! use std::{thread, time::Duration};
//!
//! use maze_solver::{Algorithm, Maze, SolveStatus};
//!
//! let mut maze = Maze::new(31, 31, true, Some(7)).unwrap();
//! maze.set_animation_speed(98);
//! maze.solve_async(Algorithm::TurnRight).unwrap();
//!
//! while maze.poll() == SolveStatus::Running {
//!     // Draw `maze.grid()` here
//!     thread::sleep(Duration::from_millis(20));
//! }
//! assert!(maze.path_length().is_some());
//! ```

pub mod controller;
pub mod error;
pub mod grid;
pub mod maze_generator;
pub mod solver;

pub use controller::Maze;
pub use error::MazeError;
pub use grid::{Cell, CellKind, Grid, Point};
pub use maze_generator::MazeGenerator;
pub use solver::{Algorithm, SolveHandle, SolveOutcome, SolveReport, SolveStatus};
