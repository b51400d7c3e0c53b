mod game;
mod grid;
mod input;
mod snake;
mod term;

use anyhow::Context;
use clap::Parser;

use crate::game::SnakeGame;
use crate::grid::Grid;

/// Terminal snake. Arrow keys or WASD steer, q / Esc / Ctrl+C quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Board width in cells, border included
    #[arg(long, default_value_t = 40)]
    width: u16,

    /// Board height in cells, border included
    #[arg(long, default_value_t = 25)]
    height: u16,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let grid = Grid::new(args.width, args.height)?;
    let mut game = SnakeGame::new(grid).context("terminal setup failed")?;
    game.run()
}
