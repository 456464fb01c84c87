use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use fieldsweep_core::{
    Board, CellCount, Coord, Coord2, Difficulty, GameState, GameStatus, MarkOutcome, Preset,
};

use crate::command::{Command, ParseError};

const RULE_WIDTH: usize = 70;

#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Skips the interactive menu when set.
    pub difficulty: Option<Difficulty>,
    pub seed: Option<u64>,
    /// Print the end-of-game summary as JSON.
    pub json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Finished,
    Quit,
}

/// Line-oriented game session over any reader and writer.
pub struct Console<I, O> {
    input: I,
    output: O,
    settings: Settings,
    games_played: u64,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O, settings: Settings) -> Self {
        Self {
            input,
            output,
            settings,
            games_played: 0,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(50))?;
        writeln!(self.output, " MINESWEEPER ")?;
        writeln!(self.output, "{}", "=".repeat(50))?;

        loop {
            let difficulty = match self.settings.difficulty.clone() {
                Some(difficulty) => difficulty,
                None => match self.select_difficulty()? {
                    Some(difficulty) => difficulty,
                    None => break,
                },
            };

            if self.play_game(difficulty)? == Flow::Quit || !self.ask_play_again()? {
                break;
            }
            writeln!(self.output, "\n{}\n", "=".repeat(RULE_WIDTH))?;
        }

        writeln!(self.output, "\nThanks for playing! Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Reads one line, `None` once input is exhausted.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        Ok((read > 0).then_some(line))
    }

    fn select_difficulty(&mut self) -> Result<Option<Difficulty>> {
        writeln!(self.output, "\nSELECT DIFFICULTY:")?;
        for (i, preset) in Preset::ALL.into_iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, Difficulty::preset(preset))?;
        }
        writeln!(self.output, "4. Custom (your own settings)")?;

        loop {
            let Some(choice) = self.prompt("\nEnter your choice (1-4): ")? else {
                return Ok(None);
            };
            match choice.trim() {
                "1" => return Ok(Some(Difficulty::beginner())),
                "2" => return Ok(Some(Difficulty::intermediate())),
                "3" => return Ok(Some(Difficulty::advanced())),
                "4" => match self.read_custom()? {
                    Some(Ok(difficulty)) => return Ok(Some(difficulty)),
                    Some(Err(message)) => writeln!(self.output, "{message}")?,
                    None => return Ok(None),
                },
                _ => writeln!(self.output, "Invalid choice! Please enter 1-4.")?,
            }
        }
    }

    fn read_custom(&mut self) -> Result<Option<std::result::Result<Difficulty, String>>> {
        let Some(rows) = self.prompt("Enter rows: ")? else {
            return Ok(None);
        };
        let Some(cols) = self.prompt("Enter columns: ")? else {
            return Ok(None);
        };
        let Some(mines) = self.prompt("Enter number of mines: ")? else {
            return Ok(None);
        };

        let parsed = (
            rows.trim().parse::<Coord>(),
            cols.trim().parse::<Coord>(),
            mines.trim().parse::<CellCount>(),
        );
        Ok(Some(match parsed {
            (Ok(rows), Ok(cols), Ok(mines)) => {
                Difficulty::custom(rows, cols, mines).map_err(|err| err.to_string())
            }
            _ => Err("Invalid input! Please enter numbers.".to_owned()),
        }))
    }

    fn ask_play_again(&mut self) -> Result<bool> {
        loop {
            let Some(choice) = self.prompt("\nPlay again? (y/n): ")? else {
                return Ok(false);
            };
            match choice.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please enter 'y' or 'n'")?,
            }
        }
    }

    fn new_game(&mut self, difficulty: Difficulty) -> Result<GameState> {
        let game = match self.settings.seed {
            // each round gets its own layout, still reproducible
            Some(seed) => GameState::with_seed(difficulty, seed.wrapping_add(self.games_played)),
            None => GameState::new(difficulty),
        };
        self.games_played += 1;
        game.context("could not create game")
    }

    fn play_game(&mut self, difficulty: Difficulty) -> Result<Flow> {
        let mut game = self.new_game(difficulty)?;
        log::info!("New game: {}", game.difficulty());

        let board = game.board();
        writeln!(
            self.output,
            "\nGame created! {} mode",
            game.difficulty().name()
        )?;
        writeln!(self.output, "   Board size: {}x{}", board.rows(), board.cols())?;
        writeln!(self.output, "   Mines: {}", board.num_mines())?;
        self.print_help()?;
        self.print_board(game.board(), false)?;

        while !game.is_finished() {
            let Some(line) = self.prompt(">>> ")? else {
                return Ok(Flow::Quit);
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(ParseError::Empty) => continue,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };
            log::debug!("Command: {:?}", command);

            match command {
                Command::Quit => return Ok(Flow::Quit),
                Command::Help => self.print_help()?,
                Command::Show => self.print_board(game.board(), false)?,
                Command::Stats => self.print_stats(&game)?,
                Command::Hint => self.hint(&mut game)?,
                Command::Reveal(coords) => self.reveal(&mut game, coords)?,
                Command::Flag(coords) => self.flag(&mut game, coords)?,
            }
        }

        self.game_over(&game)?;
        Ok(Flow::Finished)
    }

    fn check_bounds(&mut self, board: &Board, coords: Coord2) -> Result<bool> {
        if board.contains(coords) {
            return Ok(true);
        }
        writeln!(
            self.output,
            "Invalid position! Row must be 0-{}, Col must be 0-{}",
            board.rows() - 1,
            board.cols() - 1
        )?;
        Ok(false)
    }

    fn reveal(&mut self, game: &mut GameState, coords: Coord2) -> Result<()> {
        if !self.check_bounds(game.board(), coords)? {
            return Ok(());
        }
        let cell = game.board()[coords];
        if cell.is_revealed() {
            writeln!(self.output, "Cell already revealed!")?;
            return Ok(());
        }
        if cell.is_flagged() {
            writeln!(
                self.output,
                "Cell is flagged! Remove flag first with: f {} {}",
                coords.0, coords.1
            )?;
            return Ok(());
        }

        game.click_cell(coords);
        self.print_board(game.board(), false)?;
        if game.status() == GameStatus::Playing {
            writeln!(
                self.output,
                "Revealed ({}, {}) - Total: {} cells",
                coords.0,
                coords.1,
                game.board().revealed_count()
            )?;
        }
        Ok(())
    }

    fn flag(&mut self, game: &mut GameState, coords: Coord2) -> Result<()> {
        if !self.check_bounds(game.board(), coords)? {
            return Ok(());
        }
        if game.status().is_initial() {
            writeln!(self.output, "Reveal a cell first!")?;
            return Ok(());
        }
        if game.board()[coords].is_revealed() {
            writeln!(self.output, "Cannot flag a revealed cell!")?;
            return Ok(());
        }

        if game.flag_cell(coords) == MarkOutcome::Changed {
            self.print_board(game.board(), false)?;
            let flags = game.board().flags_placed();
            if game.board()[coords].is_flagged() {
                writeln!(
                    self.output,
                    "Flagged ({}, {}) - Total flags: {flags}",
                    coords.0, coords.1
                )?;
            } else {
                writeln!(
                    self.output,
                    "Unflagged ({}, {}) - Total flags: {flags}",
                    coords.0, coords.1
                )?;
            }
        }
        Ok(())
    }

    fn hint(&mut self, game: &mut GameState) -> Result<()> {
        if game.use_hint() {
            writeln!(
                self.output,
                "Hint used! ({}/{})",
                game.hints_used(),
                game.max_hints()
            )?;
            self.print_board(game.board(), false)?;
        } else if game.status().is_initial() {
            writeln!(self.output, "Reveal a cell first!")?;
        } else if game.hints_left() == 0 {
            writeln!(self.output, "No hints remaining!")?;
        } else {
            writeln!(self.output, "No safe cells to reveal!")?;
        }
        Ok(())
    }

    fn print_board(&mut self, board: &Board, reveal_all: bool) -> Result<()> {
        writeln!(self.output, "\n{}\n", board.render(reveal_all))?;
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(
            self.output,
            "\n{rule}
HOW TO PLAY:
{rule}
  Commands:
    r <row> <col>  - Reveal a cell
    f <row> <col>  - Toggle flag on a cell
    h              - Use a hint (reveals safe cell)
    show           - Show the board
    stats          - Show game statistics
    help           - Show this help
    quit           - Quit the game

  Legend:
    .  = Hidden cell
    F  = Flagged cell (you think there's a mine)
    *  = Mine (you lose if you see this!)
    _  = Empty cell (no adjacent mines)
    1-8 = Number of adjacent mines

  Goal: Reveal all safe cells without hitting any mines!
{rule}"
        )?;
        Ok(())
    }

    fn print_stats(&mut self, game: &GameState) -> Result<()> {
        let board = game.board();
        let revealed = board.revealed_count();
        let total_safe = board.safe_cell_count();
        let progress = if total_safe > 0 {
            f64::from(revealed) / f64::from(total_safe) * 100.0
        } else {
            0.0
        };

        writeln!(self.output, "\nGAME STATISTICS:")?;
        writeln!(self.output, "   Time: {}s", game.elapsed_secs())?;
        writeln!(self.output, "   Mines: {}", board.num_mines())?;
        writeln!(
            self.output,
            "   Flags: {}/{}",
            board.flags_placed(),
            board.num_mines()
        )?;
        writeln!(
            self.output,
            "   Hints: {}/{}",
            game.hints_used(),
            game.max_hints()
        )?;
        writeln!(
            self.output,
            "   Progress: {revealed}/{total_safe} cells ({progress:.1}%)"
        )?;
        Ok(())
    }

    fn game_over(&mut self, game: &GameState) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        if game.status() == GameStatus::Won {
            writeln!(self.output, "\n{rule}")?;
            writeln!(self.output, "!!! CONGRATULATIONS! YOU WIN! !!!")?;
            writeln!(self.output, "{rule}")?;
            writeln!(self.output, " Time: {} seconds", game.elapsed_secs())?;
            writeln!(self.output, " Hints used: {}", game.hints_used())?;
            writeln!(self.output, " Score: {}", game.score())?;
            writeln!(self.output, "{rule}")?;
        } else {
            writeln!(self.output, "\n{rule}")?;
            writeln!(self.output, "GAME OVER! YOU HIT A MINE!")?;
            writeln!(self.output, "{rule}")?;
            writeln!(self.output, " Time survived: {} seconds", game.elapsed_secs())?;
            writeln!(self.output, " Hints used: {}", game.hints_used())?;
            writeln!(self.output, "\nHere's where all the mines were:")?;
            self.print_board(game.board(), true)?;
        }

        if let Some(summary) = game.summary() {
            log::info!(
                "Game over: {} won={} score={}",
                summary.difficulty,
                summary.won,
                summary.score
            );
            if self.settings.json {
                let json =
                    serde_json::to_string(&summary).context("could not serialize summary")?;
                writeln!(self.output, "{json}")?;
            }
        }
        Ok(())
    }
}
