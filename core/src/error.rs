use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Board must be at least {min}x{min}")]
    BoardTooSmall { min: Coord },
    #[error("Too many mines, {mines} requested but at most {max} fit")]
    TooManyMines { mines: CellCount, max: CellCount },
    #[error("At least one mine is required")]
    NoMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, GameError>;
