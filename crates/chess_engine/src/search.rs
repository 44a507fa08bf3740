//! Fixed-depth minimax with alpha-beta pruning. The search mutates the one
//! board it is handed and relies on strict apply/undo pairing: every branch,
//! including pruned ones, restores the board before the next candidate runs.

use chess_core::{Board, Color, PieceId, Position};
use log::debug;
use rand::seq::SliceRandom;

use crate::evaluation::evaluate;

/// Score bound for the search window; doubles as the "no legal move"
/// sentinel a caller checks the returned score against.
pub const INFINITY: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    /// Chosen piece and destination. `None` only when the side to move had
    /// no pseudo-legal moves at all; with `score` at the sentinel the move
    /// carried here is provisional and the caller should treat the position
    /// as checkmate or stalemate.
    pub best: Option<(PieceId, Position)>,
}

/// Choose a move for `side` by searching `depth` plies ahead.
pub fn search(board: &mut Board, side: Color, depth: u8) -> SearchResult {
    let result = minimax(board, depth, -INFINITY, INFINITY, true, side);
    debug!(
        "search for {side} at depth {depth} settled on score {}",
        result.score
    );
    result
}

fn minimax(
    board: &mut Board,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    engine: Color,
) -> SearchResult {
    if depth == 0 {
        return SearchResult {
            score: evaluate(board, engine),
            best: None,
        };
    }

    let to_move = if maximizing { engine } else { engine.opponent() };

    // Castling candidates ride along on the king's move list.
    let king = board.king(to_move);
    let rights = board.castling_rights(to_move);
    let mut candidates: Vec<(PieceId, Position, bool)> = Vec::new();
    for (id, moves) in board.piece_moves(to_move) {
        for to in moves {
            candidates.push((id, to, false));
        }
        if id == king {
            for to in rights.candidates() {
                candidates.push((id, to, true));
            }
        }
    }

    let sentinel = if maximizing { -INFINITY } else { INFINITY };
    // A random provisional best keeps the returned move playable even when
    // no branch improves on the sentinel.
    let Some(&(best_id, best_to, _)) = candidates.choose(&mut rand::thread_rng()) else {
        return SearchResult {
            score: sentinel,
            best: None,
        };
    };
    let mut best = (best_id, best_to);
    let mut value = sentinel;

    for (id, to, is_castle) in candidates {
        let score = if is_castle {
            let Some(undo) = board.execute_castle(to_move, to) else {
                continue;
            };
            let reply = minimax(board, depth - 1, alpha, beta, !maximizing, engine);
            board.undo_castle(undo);
            reply.score
        } else {
            let undo = board.apply_move(id, to);
            board.mark_moved(id);
            if board.is_in_check(to_move) {
                // Leaves the mover's own king hanging; discard unexplored.
                board.undo_move(undo);
                continue;
            }
            let reply = minimax(board, depth - 1, alpha, beta, !maximizing, engine);
            board.undo_move(undo);
            reply.score
        };

        if maximizing {
            if score > value {
                value = score;
                best = (id, to);
            }
            alpha = alpha.max(value);
        } else {
            if score < value {
                value = score;
                best = (id, to);
            }
            beta = beta.min(value);
        }
        if alpha >= beta {
            break;
        }
    }

    SearchResult {
        score: value,
        best: Some(best),
    }
}

#[cfg(test)]
mod tests {
    use super::{search, INFINITY};
    use crate::evaluation::evaluate;
    use chess_core::{Board, Color, PieceKind, Position};

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn depth_one_matches_best_static_evaluation() {
        let mut board = Board::new();

        // Brute force: score every legal white opening move exactly the way
        // the search applies it (no castling is available here).
        let mut expected = -INFINITY;
        for (id, moves) in board.piece_moves(Color::White) {
            for to in moves {
                let undo = board.apply_move(id, to);
                board.mark_moved(id);
                if !board.is_in_check(Color::White) {
                    expected = expected.max(evaluate(&board, Color::White));
                }
                board.undo_move(undo);
            }
        }

        let result = search(&mut board, Color::White, 1);
        assert_eq!(result.score, expected);
        assert!(result.best.is_some());
    }

    #[test]
    fn search_restores_the_board_it_was_given() {
        let mut board = Board::new();
        let snapshot = board.clone();
        search(&mut board, Color::White, 2);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn castle_branches_restore_the_board() {
        let mut board = Board::from_setup(&[
            (PieceKind::King, Color::White, pos("e1")),
            (PieceKind::Rook, Color::White, pos("h1")),
            (PieceKind::King, Color::Black, pos("e8")),
        ])
        .unwrap();
        assert_eq!(board.castling_rights(Color::White).kingside, Some(pos("g1")));
        let snapshot = board.clone();

        let result = search(&mut board, Color::White, 2);
        assert_eq!(board, snapshot);
        assert!(result.score > -INFINITY);
    }

    #[test]
    fn checked_king_escapes_the_file() {
        let mut board = Board::from_setup(&[
            (PieceKind::King, Color::Black, pos("d8")),
            (PieceKind::Rook, Color::White, pos("d1")),
            (PieceKind::King, Color::White, pos("h1")),
        ])
        .unwrap();
        assert!(board.is_in_check(Color::Black));

        let result = search(&mut board, Color::Black, 2);
        assert!(result.score > -INFINITY);
        let (id, to) = result.best.unwrap();
        assert_eq!(id, board.king(Color::Black));
        assert_ne!(to.col, 3, "the king must step off the attacked file");
    }

    #[test]
    fn trapped_king_yields_the_sentinel() {
        let mut board = Board::from_setup(&[
            (PieceKind::King, Color::Black, pos("h8")),
            (PieceKind::Rook, Color::White, pos("a8")),
            (PieceKind::Rook, Color::White, pos("b7")),
            (PieceKind::King, Color::White, pos("e1")),
        ])
        .unwrap();
        assert!(board.is_in_check(Color::Black));

        let result = search(&mut board, Color::Black, 2);
        assert_eq!(result.score, -INFINITY);
    }

    #[test]
    fn never_plays_into_check() {
        // The black rook is pinned: grabbing the loose queen on a7 would
        // expose the king to the rook on e1.
        let mut board = Board::from_setup(&[
            (PieceKind::King, Color::Black, pos("e8")),
            (PieceKind::Rook, Color::Black, pos("e7")),
            (PieceKind::Queen, Color::White, pos("a7")),
            (PieceKind::Rook, Color::White, pos("e1")),
            (PieceKind::King, Color::White, pos("a1")),
        ])
        .unwrap();

        for _ in 0..5 {
            let result = search(&mut board, Color::Black, 2);
            assert!(result.score > -INFINITY);
            let (id, to) = result.best.unwrap();
            let undo = board.apply_move(id, to);
            board.mark_moved(id);
            assert!(
                !board.is_in_check(Color::Black),
                "search picked {to}, leaving the king in check"
            );
            board.undo_move(undo);
        }
    }
}
