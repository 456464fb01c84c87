use std::fmt;

use crate::*;

/// Text symbol for a cell.
///
/// `.` hidden, `F` flagged, `*` mine, `_` no adjacent mines, `1`-`8` adjacent mine count.
/// With `reveal_all` every cell is drawn as if revealed.
pub fn glyph(cell: &Cell, reveal_all: bool) -> char {
    if reveal_all || cell.is_revealed() {
        match cell.content() {
            CellContent::Mine => '*',
            CellContent::Safe(0) => '_',
            CellContent::Safe(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
            CellContent::Unplaced => '.',
        }
    } else if cell.is_flagged() {
        'F'
    } else {
        '.'
    }
}

/// Printable dump of a board, see [`Board::render`].
#[derive(Copy, Clone, Debug)]
pub struct BoardView<'a> {
    board: &'a Board,
    reveal_all: bool,
}

impl Board {
    /// Diagnostic rendering with row and column indices and the flag counter.
    pub fn render(&self, reveal_all: bool) -> BoardView<'_> {
        BoardView {
            board: self,
            reveal_all,
        }
    }
}

fn write_column_header(f: &mut fmt::Formatter<'_>, cols: Coord) -> fmt::Result {
    write!(f, "  ")?;
    for col in 0..cols {
        write!(f, " {}", col % 10)?;
    }
    writeln!(f)
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board;
        let (rows, cols) = board.size();
        let rule = "=".repeat(usize::from(cols) * 2 + 3);

        writeln!(f, "{rule}")?;
        writeln!(f, "  Board: {}x{}, {} mines", rows, cols, board.num_mines())?;
        writeln!(f, "{rule}")?;
        write_column_header(f, cols)?;
        for row in 0..rows {
            write!(f, "{row:2}")?;
            for col in 0..cols {
                write!(f, " {}", glyph(&board[(row, col)], self.reveal_all))?;
            }
            writeln!(f, " {row}")?;
        }
        write_column_header(f, cols)?;
        writeln!(f, "{rule}")?;
        write!(
            f,
            "Flags placed: {}/{}",
            board.flags_placed(),
            board.num_mines()
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.render(false), f)
    }
}
