use chess_core::{Board, Color, Piece, PieceKind};

// Material values on the engine's own scale (a pawn is worth 60).
const KING_VALUE: i32 = 1000;
const QUEEN_VALUE: i32 = 1050;
const ROOK_VALUE: i32 = 500;
const BISHOP_VALUE: i32 = 300;
const KNIGHT_VALUE: i32 = 325;
const PAWN_VALUE: i32 = 60;

// Positional adjustments.
const CHECK_PRESSURE: i32 = 200;     // a king sitting inside enemy coverage
const CASTLE_RIGHT_BONUS: i32 = 50;  // an available castle is worth keeping
const ROOK_HOME_BONUS: i32 = 40;     // unmoved rook still anchoring its corner
const QUEEN_UNDEVELOPED_PENALTY: i32 = 100;
const KNIGHT_UNDEVELOPED_PENALTY: i32 = 50;
const BISHOP_UNDEVELOPED_PENALTY: i32 = 40;
const PAWN_UNDEVELOPED_PENALTY: i32 = 20;

/// Static score of the position from `side`'s point of view; positive favors
/// `side`. Sums material and development terms over every piece on the board,
/// then adds check pressure against either king and a bonus while `side`
/// still has a castle available. Both colors are weighed with the same
/// constants, each relative to its own home ranks.
pub fn evaluate(board: &Board, side: Color) -> i32 {
    let mut score = 0;
    for (_, piece) in board.pieces() {
        let sign = if piece.color == side { 1 } else { -1 };
        score += sign * (material(piece.kind) + placement(piece));
    }

    let own_coverage = board.occupied_moves(side);
    let their_coverage = board.occupied_moves(side.opponent());
    if their_coverage.contains(&board.piece(board.king(side)).pos) {
        score -= CHECK_PRESSURE;
    }
    if own_coverage.contains(&board.piece(board.king(side.opponent())).pos) {
        score += CHECK_PRESSURE;
    }
    if board.castling_rights(side).any() {
        score += CASTLE_RIGHT_BONUS;
    }

    score
}

fn material(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

/// Development terms: reward a rook that still anchors its corner, penalize
/// pieces loitering on the squares they should have developed from.
fn placement(piece: &Piece) -> i32 {
    let home = piece.color.home_row();
    let pawn_row = piece.color.pawn_row();
    let on_back_ranks = piece.pos.row == home || piece.pos.row == pawn_row;

    match piece.kind {
        PieceKind::Rook => {
            let on_corner = piece.pos.row == home && (piece.pos.col == 0 || piece.pos.col == 7);
            if on_corner && !piece.moved {
                ROOK_HOME_BONUS
            } else {
                0
            }
        }
        PieceKind::Queen if on_back_ranks => -QUEEN_UNDEVELOPED_PENALTY,
        PieceKind::Bishop if on_back_ranks => -BISHOP_UNDEVELOPED_PENALTY,
        PieceKind::Knight
            if piece.pos.row == home && (piece.pos.col == 1 || piece.pos.col == 6) =>
        {
            -KNIGHT_UNDEVELOPED_PENALTY
        }
        PieceKind::Pawn if piece.pos.row == pawn_row && (2..=4).contains(&piece.pos.col) => {
            -PAWN_UNDEVELOPED_PENALTY
        }
        _ => 0,
    }
}
