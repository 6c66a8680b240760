//! CLI for maze generation

use anyhow::Context;
use clap::Parser;
use maze_solver::maze_generator::MazeGenerator;

/// Maze generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generated maze height
    #[arg(long, default_value_t = 41)]
    rows: usize,

    /// Generated maze width
    #[arg(long, default_value_t = 41)]
    cols: usize,

    /// Knock out extra walls to create loops
    #[arg(short, long)]
    difficult: bool,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Carve a maze, print it
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut gen = MazeGenerator::new(args.seed);
    let grid = gen
        .generate(args.rows, args.cols, args.difficult)
        .context("could not carve the maze")?;
    println!("{}", grid);
    Ok(())
}
