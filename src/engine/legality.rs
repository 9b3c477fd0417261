//! Legality filter and attack detection.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves ([`crate::engine::movegen`]).
//!   2. Filter: copy the position, play the move, verify the mover's king is
//!      not attacked.
//!
//! Castling additionally requires the king's start, transit and destination
//! squares to be unattacked.

use crate::engine::board::{Board, Position};
use crate::engine::movegen::{self, DIAGONAL, KNIGHT_STEPS, ORTHOGONAL};
use crate::engine::types::{Color, Move, PieceType, Square};

// =========================================================================
// Attack detection
// =========================================================================

/// Is `sq` attacked by any piece of the side opposing `defender`?
pub fn is_square_attacked(board: &Board, sq: Square, defender: Color) -> bool {
    let attacker = !defender;
    let is = |target: Option<Square>, kinds: &[PieceType]| {
        target
            .and_then(|t| board.get(t))
            .is_some_and(|p| p.color == attacker && kinds.contains(&p.kind))
    };

    // Pawns: an attacking pawn sits one row "behind" sq from its own point of view.
    let back = -attacker.forward();
    if is(sq.offset(back, -1), &[PieceType::Pawn]) || is(sq.offset(back, 1), &[PieceType::Pawn]) {
        return true;
    }

    if KNIGHT_STEPS
        .iter()
        .any(|&(dr, dc)| is(sq.offset(dr, dc), &[PieceType::Knight]))
    {
        return true;
    }

    if ORTHOGONAL
        .iter()
        .chain(DIAGONAL.iter())
        .any(|&(dr, dc)| is(sq.offset(dr, dc), &[PieceType::King]))
    {
        return true;
    }

    ray_hits(board, sq, &ORTHOGONAL, attacker, PieceType::Rook)
        || ray_hits(board, sq, &DIAGONAL, attacker, PieceType::Bishop)
}

/// Does a ray from `sq` reach a `slider` or queen of `attacker` before any
/// other piece?
fn ray_hits(
    board: &Board,
    sq: Square,
    dirs: &[(i8, i8)],
    attacker: Color,
    slider: PieceType,
) -> bool {
    dirs.iter().any(|&(dr, dc)| {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(dr, dc) {
            if let Some(p) = board.get(next) {
                return p.color == attacker && (p.kind == slider || p.kind == PieceType::Queen);
            }
            cursor = next;
        }
        false
    })
}

/// Is `color`'s king currently attacked?
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|k| is_square_attacked(board, k, color))
}

// =========================================================================
// Simulation & filtering
// =========================================================================

/// Copy of `pos` with `mv` played. The original is untouched.
pub fn simulate(pos: &Position, mv: Move) -> Position {
    let mut next = *pos;
    next.apply(mv);
    next
}

/// Would playing `mv` keep the mover's king safe?
pub fn is_legal(pos: &Position, mv: Move) -> bool {
    let Some(mover) = pos.piece_at(mv.from) else {
        return false;
    };
    let us = mover.color;

    if mv.flags.is_castling() {
        // King may not castle out of, through, or into check.
        let row = us.back_row();
        let transit = if mv.flags.is_castle_kingside() { 5 } else { 3 };
        for col in [4, transit, mv.to.col()] {
            if is_square_attacked(&pos.board, Square::at(row, col), us) {
                return false;
            }
        }
    }

    let after = simulate(pos, mv);
    !is_in_check(&after.board, us)
}

/// Legal moves of the piece on `from`.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    movegen::pseudo_legal_moves(pos, from)
        .into_iter()
        .filter(|&mv| is_legal(pos, mv))
        .collect()
}

/// All legal moves for the side to move.
pub fn all_legal_moves(pos: &Position) -> Vec<Move> {
    movegen::all_pseudo_legal_moves(pos)
        .into_iter()
        .filter(|&mv| is_legal(pos, mv))
        .collect()
}

/// Does the side to move have at least one legal move? Stops at the first.
pub fn has_any_legal_move(pos: &Position) -> bool {
    pos.board.pieces_of(pos.side_to_move).any(|(from, _)| {
        movegen::pseudo_legal_moves(pos, from)
            .into_iter()
            .any(|mv| is_legal(pos, mv))
    })
}

// =========================================================================
// Tests
// =========================================================================
