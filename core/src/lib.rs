//! Single-player minesweeper engine.
//!
//! A [`GameState`] owns one [`Board`] and drives it through three primitives:
//! [`GameState::click_cell`], [`GameState::flag_cell`] and [`GameState::use_hint`].
//! Mines are placed lazily on the first reveal, so the first click is always safe.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use clock::*;
pub use difficulty::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use render::*;
pub use types::*;

mod board;
mod cell;
mod clock;
mod difficulty;
mod error;
mod game;
mod generator;
mod render;
mod types;

/// Board dimensions and mine count, without any scoring meaning attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Checks that the triple forms a legal board: non-empty and at least one safe cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let total_cells = self.total_cells();
        if self.mines >= total_cells {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                max: total_cells - 1,
            });
        }
        Ok(())
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn hit_mine(self) -> bool {
        matches!(self, Self::HitMine)
    }
}
