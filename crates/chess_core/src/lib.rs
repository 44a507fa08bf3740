// Core chess board model: grid state, move generation, check detection,
// castling, and reversible move transactions for search.
pub mod board;
pub mod moves;
pub mod piece;
pub mod position;

// Re-export main types for convenience
pub use board::{Board, CastleUndo, CastlingRights, MoveError, MoveUndo, SetupError};
pub use piece::{Color, Piece, PieceId, PieceKind};
pub use position::{ParseSquareError, Position};
