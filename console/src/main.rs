use std::io;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use fieldsweep_core::{CellCount, Coord, Difficulty};

use crate::console::{Console, Settings};

mod command;
mod console;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Beginner,
    Intermediate,
    Advanced,
    Custom,
}

/// Play minesweeper in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Skip the menu and start with this difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Rows for a custom board
    #[arg(long, default_value_t = 10)]
    rows: Coord,
    /// Columns for a custom board
    #[arg(long, default_value_t = 10)]
    cols: Coord,
    /// Mines for a custom board
    #[arg(short, long, default_value_t = 15)]
    mines: CellCount,
    /// Seed for reproducible mine layouts and hints
    #[arg(long)]
    seed: Option<u64>,
    /// Print the end-of-game summary as JSON
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    fn difficulty(&self) -> Result<Option<Difficulty>> {
        Ok(match self.difficulty {
            None => None,
            Some(DifficultyArg::Beginner) => Some(Difficulty::beginner()),
            Some(DifficultyArg::Intermediate) => Some(Difficulty::intermediate()),
            Some(DifficultyArg::Advanced) => Some(Difficulty::advanced()),
            Some(DifficultyArg::Custom) => Some(
                Difficulty::custom(self.rows, self.cols, self.mines)
                    .context("invalid custom difficulty")?,
            ),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let settings = Settings {
        difficulty: cli.difficulty()?,
        seed: cli.seed,
        json: cli.json,
    };
    log::debug!("Starting with {:?}", settings);

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock(), settings);
    console.run()
}
