//! Static position evaluation.
//!
//! Returns a score in centipawns from a fixed perspective colour.
//! Positive = good for that colour, negative = good for the opponent.
//!
//! Components:
//!   1. Material balance
//!   2. Piece-square tables (middle-game)
//!   3. Retained castling rights
//!   4. Check, checkmate and stalemate adjustments

use crate::engine::board::Position;
use crate::engine::legality;
use crate::engine::types::{Color, Piece, Square};

/// Infinity sentinel. Larger than any realistic eval.
pub const INF: i32 = 100_000;

/// Checkmate score base. Mate scores found in search are `MATE - ply` so
/// closer mates score higher.
pub const MATE: i32 = 90_000;

/// Bonus per castling right still held.
pub const CASTLING_RIGHT_BONUS: i32 = 15;

/// Bonus for giving check, penalty for being in it.
pub const CHECK_BONUS: i32 = 50;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - 500
}

// =========================================================================
// Piece-Square Tables (middle-game, from White's perspective)
//
// Indexed by row * 8 + col (a1 = 0 .. h8 = 63).
// Values are centipawn bonuses/penalties.
// =========================================================================

/// Pawn PST: encourages central pawns and advancement.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,   // rank 1 (never occupied)
     5, 10, 10,-20,-20, 10, 10,  5,   // rank 2
     5, -5,-10,  0,  0,-10, -5,  5,   // rank 3
     0,  0,  0, 20, 20,  0,  0,  0,   // rank 4
     5,  5, 10, 25, 25, 10,  5,  5,   // rank 5
    10, 10, 20, 30, 30, 20, 10, 10,   // rank 6
    50, 50, 50, 50, 50, 50, 50, 50,   // rank 7
     0,  0,  0,  0,  0,  0,  0,  0,   // rank 8 (promoted)
];

/// Knight PST: encourages centralization.
#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

/// Bishop PST: encourages long diagonals and avoids corners.
#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

/// Rook PST: encourages the 7th rank.
#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
      0,  0,  0,  5,  5,  0,  0,  0,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
      5, 10, 10, 10, 10, 10, 10,  5,
      0,  0,  0,  0,  0,  0,  0,  0,
];

/// Queen PST: minor centralization bonus.
#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  5,  5,  5,  5,  5,  0,-10,
      0,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

/// King PST (middle-game): encourages castled position, penalizes center.
#[rustfmt::skip]
const KING_MG_PST: [i32; 64] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

/// Indexed by [`PieceType::index`](crate::engine::types::PieceType::index).
const PST: [[i32; 64]; 6] = [
    PAWN_PST,
    KNIGHT_PST,
    BISHOP_PST,
    ROOK_PST,
    QUEEN_PST,
    KING_MG_PST,
];

// =========================================================================
// Evaluation
// =========================================================================

/// Evaluate `pos` for `perspective`.
///
/// Terminal positions short-circuit: checkmate is `±MATE`, stalemate is 0.
pub fn evaluate(pos: &Position, perspective: Color) -> i32 {
    let side = pos.side_to_move;
    let in_check = legality::is_in_check(&pos.board, side);

    if !legality::has_any_legal_move(pos) {
        return match (in_check, side == perspective) {
            (false, _) => 0,
            (true, true) => -MATE,
            (true, false) => MATE,
        };
    }

    let mut score = 0i32;
    for (sq, piece) in pos.board.pieces() {
        let value = piece_score(piece, sq);
        if piece.color == perspective {
            score += value;
        } else {
            score -= value;
        }
    }

    score += CASTLING_RIGHT_BONUS * pos.castling.retained(perspective) as i32;
    score -= CASTLING_RIGHT_BONUS * pos.castling.retained(!perspective) as i32;

    if in_check {
        score += if side == perspective {
            -CHECK_BONUS
        } else {
            CHECK_BONUS
        };
    }

    score
}

/// Material plus table bonus for one piece, from its owner's point of view.
#[inline]
fn piece_score(piece: Piece, sq: Square) -> i32 {
    piece.kind.value() + PST[piece.kind.index()][pst_index(piece.color, sq)]
}

/// Table slot for `sq`, mirrored vertically for Black.
#[inline]
fn pst_index(color: Color, sq: Square) -> usize {
    let row = match color {
        Color::White => sq.row(),
        Color::Black => 7 - sq.row(),
    };
    row as usize * 8 + sq.col() as usize
}

// =========================================================================
// Tests
// =========================================================================
