//! Pseudo-legal move generation. Destinations here ignore whether the move
//! would leave the mover's own king in check; callers filter that with
//! [`Board::is_in_check`] or use [`Board::legal_destinations`].

use crate::{Board, Color, PieceId, PieceKind, Position};

const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Board {
    /// Squares the piece could occupy next, ignoring check legality.
    pub fn valid_moves(&self, id: PieceId) -> Vec<Position> {
        let piece = self.piece(id);
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(piece.pos, piece.color),
            PieceKind::Rook => self.sliding_moves(piece.pos, piece.color, &ROOK_DIRS),
            PieceKind::Bishop => self.sliding_moves(piece.pos, piece.color, &BISHOP_DIRS),
            PieceKind::Queen => {
                let mut moves = self.sliding_moves(piece.pos, piece.color, &ROOK_DIRS);
                moves.extend(self.sliding_moves(piece.pos, piece.color, &BISHOP_DIRS));
                moves
            }
            PieceKind::Knight => self.leaper_moves(piece.pos, piece.color, &KNIGHT_OFFSETS),
            PieceKind::King => self.leaper_moves(piece.pos, piece.color, &KING_OFFSETS),
        }
    }

    /// Walk each ray until the board edge, stopping on the first occupied
    /// square (included when it holds an opponent piece).
    fn sliding_moves(&self, from: Position, color: Color, dirs: &[(i8, i8)]) -> Vec<Position> {
        let mut moves = Vec::new();
        for &(dr, dc) in dirs {
            let mut square = from;
            while let Some(next) = square.offset(dr, dc) {
                match self.piece_at(next) {
                    None => {
                        moves.push(next);
                        square = next;
                    }
                    Some(other) => {
                        if self.piece(other).color != color {
                            moves.push(next);
                        }
                        break;
                    }
                }
            }
        }
        moves
    }

    fn leaper_moves(&self, from: Position, color: Color, offsets: &[(i8, i8)]) -> Vec<Position> {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| {
                self.piece_at(to)
                    .map_or(true, |id| self.piece(id).color != color)
            })
            .collect()
    }

    fn pawn_moves(&self, from: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        let dir = color.forward();

        if let Some(one) = from.offset(dir, 0) {
            if self.piece_at(one).is_none() {
                moves.push(one);
                if from.row == color.pawn_row() {
                    if let Some(two) = one.offset(dir, 0) {
                        if self.piece_at(two).is_none() {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        // Diagonal squares only on capture; no en-passant.
        for dc in [-1, 1] {
            if let Some(diag) = from.offset(dir, dc) {
                if let Some(id) = self.piece_at(diag) {
                    if self.piece(id).color != color {
                        moves.push(diag);
                    }
                }
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use crate::{Board, Color, PieceKind, Position};

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn all_destinations_on_board_and_never_friendly() {
        let board = Board::new();
        for (id, piece) in board.pieces() {
            for to in board.valid_moves(id) {
                assert!(to.row < 8 && to.col < 8);
                if let Some(other) = board.piece_at(to) {
                    assert_ne!(
                        board.piece(other).color,
                        piece.color,
                        "{} piece may not land on its own {:?}",
                        piece.color,
                        board.piece(other).kind
                    );
                }
            }
        }
    }

    #[test]
    fn sliders_stop_at_first_occupied_square() {
        let board = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("e1")),
            (PieceKind::King, Color::Black, pos("e8")),
            (PieceKind::Rook, Color::White, pos("a4")),
            (PieceKind::Pawn, Color::White, pos("d4")),
            (PieceKind::Pawn, Color::Black, pos("a6")),
        ])
        .unwrap();
        let rook = board.piece_at(pos("a4")).unwrap();
        let moves = board.valid_moves(rook);

        // Right along the rank: stops before the friendly pawn on d4.
        assert!(moves.contains(&pos("b4")));
        assert!(moves.contains(&pos("c4")));
        assert!(!moves.contains(&pos("d4")));
        assert!(!moves.contains(&pos("e4")));
        // Up the file: captures the black pawn on a6 and goes no further.
        assert!(moves.contains(&pos("a5")));
        assert!(moves.contains(&pos("a6")));
        assert!(!moves.contains(&pos("a7")));
    }

    #[test]
    fn knight_jumps_from_start() {
        let board = Board::new();
        let knight = board.piece_at(pos("b1")).unwrap();
        let mut moves = board.valid_moves(knight);
        moves.sort_by_key(|p| (p.row, p.col));
        assert_eq!(moves, vec![pos("a3"), pos("c3")]);
    }

    #[test]
    fn pawn_single_and_double_push() {
        let board = Board::new();
        let pawn = board.piece_at(pos("e2")).unwrap();
        let moves = board.valid_moves(pawn);
        assert_eq!(moves, vec![pos("e3"), pos("e4")]);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let board = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("e1")),
            (PieceKind::King, Color::Black, pos("e8")),
            (PieceKind::Pawn, Color::White, pos("e2")),
            (PieceKind::Knight, Color::Black, pos("e4")),
        ])
        .unwrap();
        let pawn = board.piece_at(pos("e2")).unwrap();
        assert_eq!(board.valid_moves(pawn), vec![pos("e3")]);

        let blocked = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("e1")),
            (PieceKind::King, Color::Black, pos("e8")),
            (PieceKind::Pawn, Color::White, pos("e2")),
            (PieceKind::Knight, Color::Black, pos("e3")),
        ])
        .unwrap();
        let pawn = blocked.piece_at(pos("e2")).unwrap();
        assert!(blocked.valid_moves(pawn).is_empty());
    }

    #[test]
    fn pawn_captures_only_diagonally_onto_enemies() {
        let board = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("e1")),
            (PieceKind::King, Color::Black, pos("e8")),
            (PieceKind::Pawn, Color::White, pos("d4")),
            (PieceKind::Pawn, Color::Black, pos("c5")),
            (PieceKind::Pawn, Color::White, pos("e5")),
        ])
        .unwrap();
        let pawn = board.piece_at(pos("d4")).unwrap();
        let moves = board.valid_moves(pawn);
        assert!(moves.contains(&pos("d5")));
        assert!(moves.contains(&pos("c5")), "enemy pawn is capturable");
        assert!(!moves.contains(&pos("e5")), "friendly pawn is not");
    }

    #[test]
    fn king_moves_one_square() {
        let board = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("d4")),
            (PieceKind::King, Color::Black, pos("h8")),
        ])
        .unwrap();
        let king = board.piece_at(pos("d4")).unwrap();
        assert_eq!(board.valid_moves(king).len(), 8);
    }
}
