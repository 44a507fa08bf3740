use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A square on the board. Row 0 is Black's home rank (rank 8), row 7 is
/// White's (rank 1), so White pawns move toward smaller rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSquareError {
    #[error("square must be two characters, like \"e4\"")]
    Length,
    #[error("no such square: {0}")]
    OutOfRange(String),
}

impl Position {
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// The square `dr` rows and `dc` columns away, or `None` off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

impl FromStr for Position {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(ParseSquareError::Length),
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(ParseSquareError::OutOfRange(s.to_string()));
        }
        Ok(Self {
            row: 8 - (rank as u8 - b'0'),
            col: file as u8 - b'a',
        })
    }
}
