//! Mailbox board representation.
//!
//! `Board` is a plain 8×8 grid of optional pieces. `Position` wraps it with
//! the side to move, castling flags, en-passant target and move counters.
//! Both are `Copy`, so simulating a move is a copy followed by [`Position::apply`].

use serde::{Deserialize, Serialize};

use crate::engine::types::{CastlingFlags, ChessError, Color, Move, Piece, PieceType, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 8×8 grid, indexed `squares[row][col]` with row 0 = rank 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard initial arrangement.
    pub fn starting() -> Self {
        const BACK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK.iter().enumerate() {
                board.squares[color.back_row() as usize][col] = Some(Piece::new(*kind, color));
                board.squares[color.pawn_row() as usize][col] =
                    Some(Piece::new(PieceType::Pawn, color));
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Remove and return whatever stands on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Occupied squares belonging to `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Where `color`'s king stands.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceType::King)
            .map(|(sq, _)| sq)
    }

    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.kind == kind).count()
    }

    /// Bare kings, or king and a single minor piece against a bare king.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        for (_, piece) in self.pieces() {
            match piece.kind {
                PieceType::King => {}
                kind if kind.is_minor() => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    }

    /// Board contents plus side to move, one character per square.
    pub fn position_key(&self, side_to_move: Color) -> String {
        let mut key = String::with_capacity(65);
        for sq in Square::all() {
            key.push(self.get(sq).map_or('.', Piece::to_char));
        }
        key.push(match side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        key
    }

    /// 8×8 array for display, rank 8 first. Pieces are like "wP", "bK".
    pub fn board_array(&self) -> [[String; 8]; 8] {
        let mut out = std::array::from_fn(|_| std::array::from_fn(|_| String::new()));
        for (sq, piece) in self.pieces() {
            let c = match piece.color {
                Color::White => 'w',
                Color::Black => 'b',
            };
            out[7 - sq.row() as usize][sq.col() as usize] = format!("{c}{}", piece.kind.letter());
        }
        out
    }

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in (0..8u8).rev() {
            s.push((b'1' + row) as char);
            s.push(' ');
            for col in 0..8u8 {
                s.push(self.get(Square::at(row, col)).map_or('.', Piece::to_char));
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Everything the rules need to generate moves: the board plus the
/// special-state flags that travel with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingFlags,
    /// Square a pawn skipped over on the previous ply, if any.
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Position {
    /// Standard starting position.
    pub fn starting() -> Self {
        Position {
            board: Board::starting(),
            side_to_move: Color::White,
            castling: CastlingFlags::FRESH,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    /// Repetition key of the current position.
    pub fn key(&self) -> String {
        self.board.position_key(self.side_to_move)
    }

    /// Play `mv` with all of its side effects, without checking legality.
    /// Returns the captured piece, if any.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let moving = self.board.take(mv.from)?;
        let us = moving.color;

        let captured = if mv.flags.is_en_passant() {
            self.board.take(Square::at(mv.from.row(), mv.to.col()))
        } else {
            self.board.take(mv.to)
        };

        let landing = match mv.promotion {
            Some(kind) if moving.kind == PieceType::Pawn => Piece::new(kind, us),
            _ => moving,
        };
        self.board.set(mv.to, Some(landing));

        if mv.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, mv.flags.is_castle_kingside());
            let rook = self.board.take(rook_from);
            self.board.set(rook_to, rook);
        }

        self.update_castling_flags(moving, mv, captured);

        self.en_passant = if mv.flags.is_double_push() {
            mv.from.offset(us.forward(), 0)
        } else {
            None
        };

        if moving.kind == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !us;

        captured
    }

    fn update_castling_flags(&mut self, moving: Piece, mv: Move, captured: Option<Piece>) {
        let us = moving.color;
        match moving.kind {
            PieceType::King => self.castling.side_mut(us).king_moved = true,
            PieceType::Rook => mark_rook_home(&mut self.castling, us, mv.from),
            _ => {}
        }
        if let Some(victim) = captured
            && victim.kind == PieceType::Rook
        {
            mark_rook_home(&mut self.castling, victim.color, mv.to);
        }
    }
}

/// Flag a rook as moved if `sq` is one of `color`'s rook home squares.
fn mark_rook_home(flags: &mut CastlingFlags, color: Color, sq: Square) {
    if sq.row() != color.back_row() {
        return;
    }
    match sq.col() {
        0 => flags.side_mut(color).queenside_rook_moved = true,
        7 => flags.side_mut(color).kingside_rook_moved = true,
        _ => {}
    }
}

/// (rook_from, rook_to) for a castle of `color` on the given wing.
pub fn castling_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let row = color.back_row();
    if kingside {
        (Square::at(row, 7), Square::at(row, 5))
    } else {
        (Square::at(row, 0), Square::at(row, 3))
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields and ensures exactly one king per side.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let board = parse_placement(fields[0])?;
        validate_kings(&board).map_err(ChessError::InvalidFen)?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        let castling = CastlingFlags::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        let en_passant = if fields[3] == "-" {
            None
        } else {
            let sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // The target sits behind a pawn the opponent just double-pushed.
            let mover = !side_to_move;
            if sq.row() as i8 != mover.pawn_row() as i8 + mover.forward() {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {sq} does not follow a {mover} double push"
                )));
            }
            Some(sq)
        };

        let halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;
        let fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);
        for row in (0..8u8).rev() {
            let mut empty = 0u8;
            for col in 0..8u8 {
                match self.board.get(Square::at(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if row > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        fen.push(' ');
        fen.push_str(&self.castling.to_fen());
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

fn parse_placement(field: &str) -> Result<Board, ChessError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = Board::empty();
    for (idx, rank_str) in ranks.iter().enumerate() {
        let row = 7 - idx as u8;
        let mut col: u8 = 0;
        for ch in rank_str.chars() {
            if col > 7 {
                return Err(ChessError::InvalidFen(format!(
                    "too many squares in rank {}",
                    row + 1
                )));
            }
            if let Some(digit) = ch.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty count '{ch}' in rank {}",
                        row + 1
                    )));
                }
                col += digit as u8;
            } else if let Some(piece) = Piece::from_char(ch) {
                board.set(Square::at(row, col), Some(piece));
                col += 1;
            } else {
                return Err(ChessError::InvalidFen(format!(
                    "invalid character '{ch}' in piece placement"
                )));
            }
        }
        if col != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} has {col} squares instead of 8",
                row + 1
            )));
        }
    }
    Ok(board)
}

/// Exactly one king per side.
pub(crate) fn validate_kings(board: &Board) -> Result<(), String> {
    for color in [Color::White, Color::Black] {
        let kings = board.count(color, PieceType::King);
        if kings != 1 {
            return Err(format!("{color} has {kings} kings (expected 1)"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
