use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest row or column count accepted for a custom board.
pub const MIN_CUSTOM_SIZE: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Beginner,
    Intermediate,
    Advanced,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Beginner, Preset::Intermediate, Preset::Advanced];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Advanced => GameConfig::new_unchecked((25, 25), 99),
        }
    }

    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    /// Exact, case-sensitive lookup by preset name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

/// A named board triple. The name alone decides the score multiplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    name: Cow<'static, str>,
    config: GameConfig,
}

impl Difficulty {
    pub const CUSTOM_NAME: &'static str = "Custom";

    pub fn new(name: impl Into<Cow<'static, str>>, config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
        })
    }

    pub const fn preset(preset: Preset) -> Self {
        Self {
            name: Cow::Borrowed(preset.name()),
            config: preset.config(),
        }
    }

    pub const fn beginner() -> Self {
        Self::preset(Preset::Beginner)
    }

    pub const fn intermediate() -> Self {
        Self::preset(Preset::Intermediate)
    }

    pub const fn advanced() -> Self {
        Self::preset(Preset::Advanced)
    }

    /// A player-chosen board: at least 3x3, at least one mine and one safe cell.
    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows < MIN_CUSTOM_SIZE || cols < MIN_CUSTOM_SIZE {
            return Err(GameError::BoardTooSmall {
                min: MIN_CUSTOM_SIZE,
            });
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        Self::new(Self::CUSTOM_NAME, GameConfig::new((rows, cols), mines)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn config(&self) -> GameConfig {
        self.config
    }

    pub fn as_preset(&self) -> Option<Preset> {
        Preset::from_name(&self.name)
    }

    /// 1 for Beginner, 2 for Intermediate, 3 for Advanced, 1 for anything else.
    pub fn multiplier(&self) -> u32 {
        self.as_preset().map_or(1, Preset::multiplier)
    }
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        Self::preset(preset)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.config.size;
        write!(
            f,
            "{} ({}x{}, {} mines)",
            self.name, rows, cols, self.config.mines
        )
    }
}
