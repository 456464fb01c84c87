use fieldsweep_core::Coord2;
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Hint,
    Show,
    Stats,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("")]
    Empty,
    #[error("Unknown command: '{0}'\n   Type 'help' for list of commands")]
    Unknown(String),
    #[error("Usage: {0} <row> <col>\n   Example: {0} 0 0")]
    Usage(&'static str),
    #[error("Invalid coordinates! Use numbers.\n   Example: {0} 0 0")]
    InvalidCoords(&'static str),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Err(ParseError::Empty);
        };

        Ok(match cmd {
            "quit" | "q" | "exit" => Self::Quit,
            "help" | "?" => Self::Help,
            "show" | "s" => Self::Show,
            "stats" => Self::Stats,
            "hint" | "h" => Self::Hint,
            "r" | "reveal" | "click" => Self::Reveal(parse_coords("r", words)?),
            "f" | "flag" => Self::Flag(parse_coords("f", words)?),
            other => return Err(ParseError::Unknown(other.to_owned())),
        })
    }
}

fn parse_coords<'a>(
    usage: &'static str,
    mut words: impl Iterator<Item = &'a str>,
) -> Result<Coord2, ParseError> {
    let (Some(row), Some(col)) = (words.next(), words.next()) else {
        return Err(ParseError::Usage(usage));
    };
    // anything past the byte range can never be on the board
    let parse = |word: &str| match word.parse::<i64>() {
        Ok(value) => Ok(u8::try_from(value).unwrap_or(u8::MAX)),
        Err(_) => Err(ParseError::InvalidCoords(usage)),
    };
    Ok((parse(row)?, parse(col)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_commands() {
        assert_eq!(Command::parse("r 3 4"), Ok(Command::Reveal((3, 4))));
        assert_eq!(Command::parse("  CLICK 0 8 "), Ok(Command::Reveal((0, 8))));
        assert_eq!(Command::parse("f 1 2"), Ok(Command::Flag((1, 2))));
        assert_eq!(Command::parse("flag 1 2 extra"), Ok(Command::Flag((1, 2))));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(Command::parse("h"), Ok(Command::Hint));
        assert_eq!(Command::parse("s"), Ok(Command::Show));
        assert_eq!(Command::parse("stats"), Ok(Command::Stats));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            Command::parse("dig 1 1"),
            Err(ParseError::Unknown("dig".to_owned()))
        );
        assert_eq!(Command::parse("r 1"), Err(ParseError::Usage("r")));
        assert_eq!(Command::parse("f a b"), Err(ParseError::InvalidCoords("f")));
    }

    #[test]
    fn out_of_range_numbers_stay_out_of_bounds() {
        assert_eq!(Command::parse("r -1 2"), Ok(Command::Reveal((255, 2))));
        assert_eq!(Command::parse("r 1000 2"), Ok(Command::Reveal((255, 2))));
    }
}
