use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Hint budget for every game.
pub const MAX_HINTS: u8 = 3;

const TIME_BONUS_SECS: i64 = 1000;
const HINT_PENALTY: i64 = 50;

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Initial state, nothing revealed yet
    #[default]
    NotStarted,
    /// Timer running
    Playing,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameStatus {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Final record of a game, handed to whoever keeps score history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub difficulty: Difficulty,
    pub won: bool,
    pub elapsed: Duration,
    pub score: u32,
    pub hints_used: u8,
}

/// `max(0, (max(0, 1000 - whole seconds) - 50 * hints) * multiplier)`
pub fn compute_score(elapsed: Duration, hints_used: u8, multiplier: u32) -> u32 {
    let secs = i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX);
    let time_bonus = TIME_BONUS_SECS.saturating_sub(secs).max(0);
    let hint_penalty = i64::from(hints_used) * HINT_PENALTY;
    let score = (time_bonus - hint_penalty) * i64::from(multiplier);
    u32::try_from(score.max(0)).unwrap_or(u32::MAX)
}

/// Represents a game from start to finish
#[derive(Debug)]
pub struct GameState<R = SmallRng, C = SystemClock> {
    board: Board,
    difficulty: Difficulty,
    status: GameStatus,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    elapsed: Duration,
    hints_used: u8,
    max_hints: u8,
    score: u32,
    rng: R,
    clock: C,
}

impl GameState {
    /// New game with an OS-seeded random source and the wall clock.
    pub fn new(difficulty: Difficulty) -> Result<Self> {
        Self::with_sources(difficulty, SmallRng::from_os_rng(), SystemClock)
    }

    /// New game whose mine layout and hints replay identically for the same seed.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Self::with_sources(difficulty, SmallRng::seed_from_u64(seed), SystemClock)
    }
}

impl<R: Rng, C: Clock> GameState<R, C> {
    pub fn with_sources(difficulty: Difficulty, rng: R, clock: C) -> Result<Self> {
        let board = Board::new(difficulty.config())?;
        Ok(Self::from_board(difficulty, board, rng, clock))
    }

    pub(crate) fn from_board(difficulty: Difficulty, board: Board, rng: R, clock: C) -> Self {
        Self {
            board,
            difficulty,
            status: GameStatus::NotStarted,
            started_at: None,
            ended_at: None,
            elapsed: Duration::ZERO,
            hints_used: 0,
            max_hints: MAX_HINTS,
            score: 0,
            rng,
            clock,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn hints_used(&self) -> u8 {
        self.hints_used
    }

    pub fn max_hints(&self) -> u8 {
        self.max_hints
    }

    pub fn hints_left(&self) -> u8 {
        self.max_hints.saturating_sub(self.hints_used)
    }

    /// Zero unless the game was won.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Running while playing, frozen once the game ended, zero before the first reveal.
    pub fn elapsed(&self) -> Duration {
        match (self.status, self.started_at) {
            (GameStatus::Playing, Some(started_at)) => {
                self.clock.now().saturating_duration_since(started_at)
            }
            _ => self.elapsed,
        }
    }

    /// Whole seconds elapsed.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    /// Available once the game has ended.
    pub fn summary(&self) -> Option<GameSummary> {
        self.status.is_finished().then(|| GameSummary {
            difficulty: self.difficulty.clone(),
            won: matches!(self.status, GameStatus::Won),
            elapsed: self.elapsed,
            score: self.score,
            hints_used: self.hints_used,
        })
    }

    /// Reveals a cell, starting the game on the first call.
    pub fn click_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if self.status.is_finished() {
            return RevealOutcome::NoChange;
        }
        self.mark_started();

        match self.board.reveal_cell(coords, &mut self.rng) {
            RevealOutcome::HitMine => {
                self.end_game(false);
                RevealOutcome::HitMine
            }
            _ if self.board.check_win() => {
                self.end_game(true);
                RevealOutcome::Won
            }
            outcome => outcome,
        }
    }

    /// Toggles a flag, only while playing.
    pub fn flag_cell(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.status.is_playing() {
            return MarkOutcome::NoChange;
        }

        let before = self.board.cell(coords).map(Cell::state);
        self.board.toggle_flag(coords);
        if self.board.cell(coords).map(Cell::state) != before {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Reveals a random safe, hidden, unflagged cell.
    ///
    /// Refused when the budget is spent or when no candidate is left. Also refused before
    /// the first reveal and after the game ended, so a hint can never place the mines or
    /// start a board without starting the timer.
    pub fn use_hint(&mut self) -> bool {
        if !self.status.is_playing() || self.hints_used >= self.max_hints {
            return false;
        }

        let candidates = self.board.safe_unrevealed_cells();
        if candidates.is_empty() {
            return false;
        }

        let coords = candidates[self.rng.random_range(0..candidates.len())];
        self.board.reveal_cell(coords, &mut self.rng);
        self.hints_used += 1;
        log::debug!(
            "Hint revealed {:?} ({}/{})",
            coords,
            self.hints_used,
            self.max_hints
        );

        if self.board.check_win() {
            self.end_game(true);
        }
        true
    }

    /// Ends the game, freezing the timer and settling the score. No-op once ended.
    pub fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        let now = self.clock.now();
        self.ended_at = Some(now);
        self.elapsed = self
            .started_at
            .map(|started_at| now.saturating_duration_since(started_at))
            .unwrap_or_default();
        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };

        if !won {
            self.board.reveal_all_mines();
        }
        self.score = if won {
            compute_score(self.elapsed, self.hints_used, self.difficulty.multiplier())
        } else {
            0
        };
        log::debug!(
            "Game {:?} after {:?}, score {}",
            self.status,
            self.elapsed,
            self.score
        );
    }

    /// Checks if the state is initial and changes to playing, recording the start time
    fn mark_started(&mut self) {
        if self.status.is_initial() {
            let now = self.clock.now();
            log::debug!("Game started: {}", self.difficulty);
            self.started_at = Some(now);
            self.status = GameStatus::Playing;
        }
    }
}
