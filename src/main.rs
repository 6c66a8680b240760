//! CLI for maze solving

use std::{thread, time::Duration};

use anyhow::Context;
use clap::Parser;
use maze_solver::{Algorithm, Maze, SolveReport};

/// Carve a random maze and find the way from the top left to the bottom right corner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze height, clamped to 21..=499 and made odd
    #[arg(long, default_value_t = 121)]
    rows: usize,

    /// Maze width, clamped to 21..=499 and made odd
    #[arg(long, default_value_t = 121)]
    cols: usize,

    /// Knock out extra walls so that there is more than one way through
    #[arg(short, long)]
    difficult: bool,

    /// Solver: bfs, dfs, a-star, turn-left or turn-right
    #[arg(short, long, default_value_t = Algorithm::AStar)]
    algorithm: Algorithm,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Animation speed in percent, 100 runs the search without pauses
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    speed: u8,

    /// Display the search on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,

    /// Print the solved maze
    #[arg(long)]
    print: bool,
}

fn print_frame(maze: &Maze) {
    print!("\x1B[2J\x1B[1;1H");
    println!("{}", *maze.grid());
}

/// Solve in the background, redrawing the maze until the solve ends
fn playback(
    maze: &mut Maze,
    algorithm: Algorithm,
    frame_length: u64,
) -> anyhow::Result<SolveReport> {
    maze.solve_async(algorithm)?;
    while maze.poll().is_running() {
        print_frame(maze);
        thread::sleep(Duration::from_millis(frame_length));
    }
    print_frame(maze);
    maze.report()
        .cloned()
        .context("background solve ended without a report")
}

/// Carve a maze, solve it and print the report
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut maze = Maze::new(args.rows, args.cols, args.difficult, args.seed)
        .context("could not carve the maze")?;
    maze.set_animation_speed(args.speed);

    let report = if args.playback {
        playback(&mut maze, args.algorithm, args.frame_length)?
    } else {
        let report = maze.solve(args.algorithm)?;
        if args.print {
            println!("{}", *maze.grid());
        }
        report
    };

    report.print_report();
    report
        .into_result()
        .with_context(|| format!("{} did not solve the maze", args.algorithm))?;
    Ok(())
}
