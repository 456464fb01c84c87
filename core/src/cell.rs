use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// What lies under a cell.
///
/// Cells start as `Unplaced` and are settled exactly once, when the board places its mines.
/// Safe cells carry their adjacent mine count, mines never do.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Unplaced,
    Mine,
    Safe(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    content: CellContent,
    state: CellState,
}

impl Cell {
    pub const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            content: CellContent::Unplaced,
            state: CellState::Hidden,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn content(&self) -> CellContent {
        self.content
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_mine(&self) -> bool {
        matches!(self.content, CellContent::Mine)
    }

    /// Number of mines among the Moore neighbours, `None` for mines and before placement.
    pub const fn adjacent_mines(&self) -> Option<u8> {
        match self.content {
            CellContent::Safe(count) => Some(count),
            CellContent::Unplaced | CellContent::Mine => None,
        }
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    /// Reveals the cell and reports whether it holds a mine.
    ///
    /// Flagged cells are left alone and report `false`.
    pub fn reveal(&mut self) -> bool {
        if self.is_flagged() {
            return false;
        }
        self.state = CellState::Revealed;
        self.is_mine()
    }

    /// Toggles between hidden and flagged, returns whether the cell is now flagged.
    pub fn toggle_flag(&mut self) -> bool {
        match self.state {
            CellState::Revealed => false,
            CellState::Hidden => {
                self.state = CellState::Flagged;
                true
            }
            CellState::Flagged => {
                self.state = CellState::Hidden;
                false
            }
        }
    }

    pub(crate) fn set_content(&mut self, content: CellContent) {
        self.content = content;
    }

    /// Reveals regardless of flags, used to expose the layout after a loss.
    pub(crate) fn force_reveal(&mut self) {
        self.state = CellState::Revealed;
    }
}
