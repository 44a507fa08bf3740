use chess_core::{Board, Color, PieceId, Position};
use log::debug;
use thiserror::Error;

use crate::search::{search, INFINITY};

/// Plies searched when no depth is configured; the reference strength of the
/// console opponent.
pub const DEFAULT_DEPTH: u8 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Checkmate or stalemate; callers tell the two apart with
    /// [`Board::is_in_check`].
    #[error("{0} has no legal moves")]
    NoLegalMoves(Color),
}

/// Engine façade holding the configured search depth.
#[derive(Debug, Clone)]
pub struct ChessAi {
    depth: u8,
}

impl ChessAi {
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Choose a move for `side`, or report that the side has none.
    pub fn select_move(
        &self,
        board: &mut Board,
        side: Color,
    ) -> Result<(PieceId, Position), SearchError> {
        let result = search(board, side, self.depth);
        if result.score == -INFINITY {
            return Err(SearchError::NoLegalMoves(side));
        }
        let (id, to) = result.best.ok_or(SearchError::NoLegalMoves(side))?;
        debug!("{side} engine: {} -> {to}", board.piece(id).pos);
        Ok((id, to))
    }
}

impl Default for ChessAi {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}
