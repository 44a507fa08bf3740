use std::collections::HashSet;
use std::fmt;

use log::debug;
use thiserror::Error;

use crate::{Color, Piece, PieceId, PieceKind, Position};

/// Castling candidates for one side: the king's destination square on each
/// wing, when that castle is currently available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub queenside: Option<Position>,
    pub kingside: Option<Position>,
}

impl CastlingRights {
    pub fn any(self) -> bool {
        self.queenside.is_some() || self.kingside.is_some()
    }

    pub fn contains(self, to: Position) -> bool {
        self.queenside == Some(to) || self.kingside == Some(to)
    }

    pub fn candidates(self) -> impl Iterator<Item = Position> {
        self.queenside.into_iter().chain(self.kingside)
    }
}

/// Transaction record returned by [`Board::apply_move`]. Feed it back to
/// [`Board::undo_move`] to restore the exact prior state — position, any
/// captured piece, the mover's `moved` flag, and a reverted promotion — or
/// drop it to make the move permanent.
#[derive(Debug, Clone, Copy)]
pub struct MoveUndo {
    piece: PieceId,
    from: Position,
    to: Position,
    captured: Option<PieceId>,
    had_moved: bool,
    promoted: bool,
}

/// Undo record for a castle: king and rook legs reversed together.
#[derive(Debug, Clone, Copy)]
pub struct CastleUndo {
    king: MoveUndo,
    rook: MoveUndo,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Position),
    #[error("the piece on {0} belongs to the other side")]
    WrongColor(Position),
    #[error("{to} is not a legal destination for the piece on {from}")]
    IllegalDestination { from: Position, to: Position },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("two pieces share square {0}")]
    OccupiedSquare(Position),
    #[error("{0} has no king")]
    MissingKing(Color),
    #[error("{0} has more than one king")]
    DuplicateKing(Color),
}

/// The 8x8 grid. Squares hold ids into a piece arena rather than pieces
/// themselves, so king and castling-rook identities stay stable across
/// captures, undos, and promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<Piece>,
    grid: [[Option<PieceId>; 8]; 8],
    white_king: PieceId,
    black_king: PieceId,
    white_rook_queenside: Option<PieceId>,
    white_rook_kingside: Option<PieceId>,
    black_rook_queenside: Option<PieceId>,
    black_rook_kingside: Option<PieceId>,
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Board {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut setup = Vec::with_capacity(32);
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            setup.push((kind, Color::Black, Position { row: 0, col }));
            setup.push((Pawn, Color::Black, Position { row: 1, col }));
            setup.push((Pawn, Color::White, Position { row: 6, col }));
            setup.push((kind, Color::White, Position { row: 7, col }));
        }
        Board::from_setup(&setup).expect("standard position is a valid setup")
    }

    /// Build an arbitrary position. Each side needs exactly one king; a king
    /// off its starting square is treated as already moved, and castling-rook
    /// identity is only assigned to rooks sitting on their corner squares.
    pub fn from_setup(setup: &[(PieceKind, Color, Position)]) -> Result<Board, SetupError> {
        let mut pieces = Vec::with_capacity(setup.len());
        let mut grid: [[Option<PieceId>; 8]; 8] = [[None; 8]; 8];
        let mut white_king = None;
        let mut black_king = None;

        for &(kind, color, pos) in setup {
            if grid[pos.row as usize][pos.col as usize].is_some() {
                return Err(SetupError::OccupiedSquare(pos));
            }
            let id = PieceId(pieces.len() as u8);
            let home = Position {
                row: color.home_row(),
                col: 4,
            };
            let moved = kind == PieceKind::King && pos != home;
            pieces.push(Piece {
                kind,
                color,
                pos,
                moved,
            });
            grid[pos.row as usize][pos.col as usize] = Some(id);
            if kind == PieceKind::King {
                let slot = match color {
                    Color::White => &mut white_king,
                    Color::Black => &mut black_king,
                };
                if slot.is_some() {
                    return Err(SetupError::DuplicateKing(color));
                }
                *slot = Some(id);
            }
        }

        let white_king = white_king.ok_or(SetupError::MissingKing(Color::White))?;
        let black_king = black_king.ok_or(SetupError::MissingKing(Color::Black))?;

        let corner_rook = |row: u8, col: u8, color: Color| -> Option<PieceId> {
            let id = grid[row as usize][col as usize]?;
            let piece = &pieces[id.index()];
            (piece.kind == PieceKind::Rook && piece.color == color).then_some(id)
        };

        Ok(Board {
            white_rook_queenside: corner_rook(7, 0, Color::White),
            white_rook_kingside: corner_rook(7, 7, Color::White),
            black_rook_queenside: corner_rook(0, 0, Color::Black),
            black_rook_kingside: corner_rook(0, 7, Color::Black),
            pieces,
            grid,
            white_king,
            black_king,
        })
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub fn piece_at(&self, pos: Position) -> Option<PieceId> {
        self.cell(pos)
    }

    pub fn king(&self, color: Color) -> PieceId {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    /// All pieces currently on the board, in grid scan order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.grid
            .iter()
            .flatten()
            .filter_map(move |&slot| slot.map(|id| (id, &self.pieces[id.index()])))
    }

    /// Set the piece's `moved` flag. Deliberately separate from
    /// [`Board::apply_move`]: search probes moves without committing them, and
    /// the undo record restores whatever value the flag had at apply time.
    pub fn mark_moved(&mut self, id: PieceId) {
        self.pieces[id.index()].moved = true;
    }

    /// Relocate a piece, capturing whatever occupied the destination. A pawn
    /// reaching its last rank becomes a queen in place (tag mutation, so the
    /// arena id is unchanged). The `moved` flag is not touched.
    pub fn apply_move(&mut self, id: PieceId, to: Position) -> MoveUndo {
        let piece = self.pieces[id.index()];
        let from = piece.pos;
        let captured = self.cell(to);
        debug_assert_eq!(self.cell(from), Some(id));
        debug_assert!(captured.map_or(true, |c| self.pieces[c.index()].color != piece.color));

        let promoted = piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row();
        self.set_cell(from, None);
        self.set_cell(to, Some(id));
        let record = &mut self.pieces[id.index()];
        record.pos = to;
        if promoted {
            record.kind = PieceKind::Queen;
        }

        MoveUndo {
            piece: id,
            from,
            to,
            captured,
            had_moved: piece.moved,
            promoted,
        }
    }

    /// Reverse a move made with [`Board::apply_move`], restoring the grid,
    /// the captured piece, the `moved` flag, and any promotion.
    pub fn undo_move(&mut self, undo: MoveUndo) {
        debug_assert_eq!(self.cell(undo.to), Some(undo.piece));

        let record = &mut self.pieces[undo.piece.index()];
        record.pos = undo.from;
        record.moved = undo.had_moved;
        if undo.promoted {
            record.kind = PieceKind::Pawn;
        }
        self.set_cell(undo.from, Some(undo.piece));
        self.set_cell(undo.to, undo.captured);

        debug_assert!(undo
            .captured
            .map_or(true, |c| self.pieces[c.index()].pos == undo.to));
    }

    /// Every square any piece of `color` could move to next: the side's
    /// attack coverage, used for check and castling-safety tests.
    pub fn occupied_moves(&self, color: Color) -> HashSet<Position> {
        let mut coverage = HashSet::new();
        for (id, piece) in self.pieces() {
            if piece.color == color {
                coverage.extend(self.valid_moves(id));
            }
        }
        coverage
    }

    /// Per-piece pseudo-legal destinations for `color`; the search engine's
    /// move enumeration source.
    pub fn piece_moves(&self, color: Color) -> Vec<(PieceId, Vec<Position>)> {
        self.pieces()
            .filter(|(_, piece)| piece.color == color)
            .map(|(id, _)| (id, self.valid_moves(id)))
            .collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        let king_pos = self.piece(self.king(color)).pos;
        self.occupied_moves(color.opponent()).contains(&king_pos)
    }

    /// Check-filtered destinations for one piece.
    pub fn legal_destinations(&mut self, id: PieceId) -> Vec<Position> {
        let color = self.piece(id).color;
        let mut legal = Vec::new();
        for to in self.valid_moves(id) {
            let undo = self.apply_move(id, to);
            if !self.is_in_check(color) {
                legal.push(to);
            }
            self.undo_move(undo);
        }
        legal
    }

    /// Castling availability for `color`. A wing qualifies when king and rook
    /// are unmoved, the rook still sits on its corner, the squares between
    /// them are empty, and no square the king transits (start included) is in
    /// the opponent's coverage. Only the king's path is checked, not the
    /// rook's own square.
    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        let mut rights = CastlingRights::default();
        if self.piece(self.king(color)).moved {
            return rights;
        }
        let row = color.home_row();
        let coverage = self.occupied_moves(color.opponent());
        let clear = |cols: &[u8]| {
            cols.iter()
                .all(|&col| self.cell(Position { row, col }).is_none())
        };
        let safe = |cols: &[u8]| {
            cols.iter()
                .all(|&col| !coverage.contains(&Position { row, col }))
        };

        let (queenside_rook, kingside_rook) = self.castle_rooks(color);
        if let Some(rook) = queenside_rook {
            let corner = Position { row, col: 0 };
            if self.cell(corner) == Some(rook)
                && !self.piece(rook).moved
                && clear(&[1, 2, 3])
                && safe(&[2, 3, 4])
            {
                rights.queenside = Some(Position { row, col: 2 });
            }
        }
        if let Some(rook) = kingside_rook {
            let corner = Position { row, col: 7 };
            if self.cell(corner) == Some(rook)
                && !self.piece(rook).moved
                && clear(&[5, 6])
                && safe(&[4, 5, 6])
            {
                rights.kingside = Some(Position { row, col: 6 });
            }
        }
        rights
    }

    /// Castle with the king landing on `to`, moving king and rook in one
    /// step and marking both moved. Returns `None` without touching the board
    /// when `to` is not a current castling candidate for `color`.
    pub fn execute_castle(&mut self, color: Color, to: Position) -> Option<CastleUndo> {
        let rights = self.castling_rights(color);
        let (queenside_rook, kingside_rook) = self.castle_rooks(color);
        let (rook, rook_to) = if rights.queenside == Some(to) {
            (
                queenside_rook?,
                Position {
                    row: to.row,
                    col: to.col + 1,
                },
            )
        } else if rights.kingside == Some(to) {
            (
                kingside_rook?,
                Position {
                    row: to.row,
                    col: to.col - 1,
                },
            )
        } else {
            return None;
        };

        let king = self.king(color);
        let king_undo = self.apply_move(king, to);
        let rook_undo = self.apply_move(rook, rook_to);
        self.mark_moved(king);
        self.mark_moved(rook);
        Some(CastleUndo {
            king: king_undo,
            rook: rook_undo,
        })
    }

    /// Reverse a castle, restoring both pieces and both `moved` flags.
    pub fn undo_castle(&mut self, undo: CastleUndo) {
        self.undo_move(undo.rook);
        self.undo_move(undo.king);
    }

    /// Validated move entry for a driver: resolves the piece on `from`,
    /// routes king moves onto a castling candidate through
    /// [`Board::execute_castle`], and otherwise requires a check-legal
    /// destination. Commits permanently on success.
    pub fn make_move(&mut self, from: Position, to: Position, color: Color) -> Result<(), MoveError> {
        let id = self.piece_at(from).ok_or(MoveError::EmptySquare(from))?;
        if self.piece(id).color != color {
            return Err(MoveError::WrongColor(from));
        }
        if self.piece(id).kind == PieceKind::King {
            if self.execute_castle(color, to).is_some() {
                debug!("{color} castles, king to {to}");
                return Ok(());
            }
        }
        if !self.legal_destinations(id).contains(&to) {
            return Err(MoveError::IllegalDestination { from, to });
        }
        self.apply_move(id, to);
        self.mark_moved(id);
        debug!("{color} plays {from}{to}");
        Ok(())
    }

    fn castle_rooks(&self, color: Color) -> (Option<PieceId>, Option<PieceId>) {
        match color {
            Color::White => (self.white_rook_queenside, self.white_rook_kingside),
            Color::Black => (self.black_rook_queenside, self.black_rook_kingside),
        }
    }

    fn cell(&self, pos: Position) -> Option<PieceId> {
        self.grid[pos.row as usize][pos.col as usize]
    }

    fn set_cell(&mut self, pos: Position, value: Option<PieceId>) {
        self.grid[pos.row as usize][pos.col as usize] = value;
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8usize {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8usize {
                let symbol = self.grid[row][col].map_or('.', |id| self.pieces[id.index()].symbol());
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
