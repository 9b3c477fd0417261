//! Pseudo-legal move generation.
//!
//! Moves here respect piece geometry and occupancy only; they may leave the
//! mover's king in check. [`crate::engine::legality`] filters them.
//!
//! Geometry is table-driven: each piece kind maps to a set of (row, col)
//! steps and a flag saying whether it slides along them.

use crate::engine::board::Position;
use crate::engine::types::{Color, Move, MoveFlags, Piece, PieceType, Square};

// =========================================================================
// Geometry tables
// =========================================================================

pub(crate) const KNIGHT_STEPS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub(crate) const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Movement rule for a non-pawn piece kind.
pub(crate) struct Geometry {
    pub steps: &'static [(i8, i8)],
    pub slides: bool,
}

/// Step table for `kind`. Pawns are handled separately and get `None`.
pub(crate) fn geometry(kind: PieceType) -> Option<Geometry> {
    let (steps, slides): (&'static [(i8, i8)], bool) = match kind {
        PieceType::Pawn => return None,
        PieceType::Knight => (&KNIGHT_STEPS, false),
        PieceType::Bishop => (&DIAGONAL, true),
        PieceType::Rook => (&ORTHOGONAL, true),
        PieceType::Queen => (&ALL_DIRECTIONS, true),
        PieceType::King => (&ALL_DIRECTIONS, false),
    };
    Some(Geometry { steps, slides })
}

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal moves of whatever piece stands on `from`.
pub fn pseudo_legal_moves(pos: &Position, from: Square) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    if let Some(piece) = pos.piece_at(from) {
        generate_for_piece(pos, from, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal moves of every piece belonging to the side to move.
pub fn all_pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in pos.board.pieces_of(pos.side_to_move) {
        generate_for_piece(pos, from, piece, &mut moves);
    }
    moves
}

fn generate_for_piece(pos: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match geometry(piece.kind) {
        None => generate_pawn_moves(pos, from, piece.color, moves),
        Some(geo) => {
            generate_stepping_moves(pos, from, piece.color, &geo, moves);
            if piece.kind == PieceType::King {
                generate_castling_candidates(pos, from, piece.color, moves);
            }
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let dir = us.forward();
    let promotes = |to: Square| to.row() == us.promotion_row();

    // --- Single and double push ---
    if let Some(one) = from.offset(dir, 0)
        && pos.board.is_empty(one)
    {
        if promotes(one) {
            add_promotions(from, one, MoveFlags::NONE, moves);
        } else {
            moves.push(Move::new(from, one));
        }

        if from.row() == us.pawn_row()
            && let Some(two) = one.offset(dir, 0)
            && pos.board.is_empty(two)
        {
            moves.push(Move::with_flags(from, two, MoveFlags::DOUBLE_PUSH));
        }
    }

    // --- Captures, including en passant ---
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != us => {
                if promotes(to) {
                    add_promotions(from, to, MoveFlags::CAPTURE, moves);
                } else {
                    moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
                }
            }
            None if pos.en_passant == Some(to) && pos.side_to_move == us => {
                moves.push(Move::with_flags(
                    from,
                    to,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

/// Add all four promotion variants for a pawn push or capture.
fn add_promotions(from: Square, to: Square, flags: MoveFlags, moves: &mut Vec<Move>) {
    for promo in PieceType::PROMOTIONS {
        moves.push(Move::with_promotion(from, to, promo, flags));
    }
}

// =========================================================================
// Knight, bishop, rook, queen, king
// =========================================================================

fn generate_stepping_moves(
    pos: &Position,
    from: Square,
    us: Color,
    geo: &Geometry,
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in geo.steps {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match pos.piece_at(to) {
                None => moves.push(Move::new(from, to)),
                Some(blocker) => {
                    if blocker.color != us {
                        moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE));
                    }
                    break;
                }
            }
            if !geo.slides {
                break;
            }
            cursor = to;
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

/// Castling candidates gated on the moved-flags, the rook being home and the
/// squares between king and rook being empty. Attack checks happen in the
/// legality filter.
fn generate_castling_candidates(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let row = us.back_row();
    if from != Square::at(row, 4) {
        return;
    }
    let rook = Some(Piece::new(PieceType::Rook, us));
    let clear = |cols: &[u8]| cols.iter().all(|&c| pos.board.is_empty(Square::at(row, c)));

    if pos.castling.can_castle_kingside(us)
        && pos.piece_at(Square::at(row, 7)) == rook
        && clear(&[5, 6])
    {
        moves.push(Move::with_flags(
            from,
            Square::at(row, 6),
            MoveFlags::CASTLE_KINGSIDE,
        ));
    }

    if pos.castling.can_castle_queenside(us)
        && pos.piece_at(Square::at(row, 0)) == rook
        && clear(&[1, 2, 3])
    {
        moves.push(Move::with_flags(
            from,
            Square::at(row, 2),
            MoveFlags::CASTLE_QUEENSIDE,
        ));
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn targets(pos: &Position, from: &str) -> Vec<String> {
        let mut out: Vec<String> = pseudo_legal_moves(pos, sq(from))
            .iter()
            .map(|m| m.to.to_algebraic())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        assert_eq!(all_pseudo_legal_moves(&Position::starting()).len(), 20);
    }

    #[test]
    fn pawn_single_and_double_push() {
        let pos = Position::starting();
        assert_eq!(targets(&pos, "e2"), vec!["e3", "e4"]);
        let double = pseudo_legal_moves(&pos, sq("e2"))
            .into_iter()
            .find(|m| m.to == sq("e4"))
            .unwrap();
        assert!(double.flags.is_double_push());
    }

    #[test]
    fn pawn_blocked() {
        let pos = Position::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert!(targets(&pos, "e2").is_empty());
    }

    #[test]
    fn pawn_double_push_blocked_on_second_square() {
        let pos = Position::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "e2"), vec!["e3"]);
    }

    #[test]
    fn pawn_captures_diagonally_only_enemies() {
        let pos = Position::from_fen("4k3/8/8/8/8/3p1P2/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "e2"), vec!["d3", "e3", "e4"]);
    }

    #[test]
    fn pawn_promotion_generates_four_moves() {
        let pos = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = pseudo_legal_moves(&pos, sq("a7"));
        // a8 push (4) + b8 capture (4)
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        assert_eq!(moves.iter().filter(|m| m.flags.is_capture()).count(), 4);
    }

    #[test]
    fn black_pawn_moves_down() {
        let pos = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(targets(&pos, "d7"), vec!["d5", "d6"]);
    }

    #[test]
    fn en_passant_candidate() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let ep = pseudo_legal_moves(&pos, sq("e5"))
            .into_iter()
            .find(|m| m.flags.is_en_passant())
            .unwrap();
        assert_eq!(ep.to, sq("d6"));
        assert!(ep.flags.is_capture());
    }

    #[test]
    fn en_passant_ignored_without_target() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(
            pseudo_legal_moves(&pos, sq("e5"))
                .iter()
                .all(|m| !m.flags.is_en_passant())
        );
    }

    #[test]
    fn knight_offsets() {
        let pos = Position::starting();
        assert_eq!(targets(&pos, "g1"), vec!["f3", "h3"]);
        let centre = Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(targets(&centre, "d4").len(), 8);
    }

    #[test]
    fn rook_ray_stops_at_blockers() {
        let pos = Position::from_fen("4k3/8/3p4/8/1P1R2n1/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            targets(&pos, "d4"),
            vec!["c4", "d1", "d2", "d3", "d5", "d6", "e4", "f4", "g4"]
        );
    }

    #[test]
    fn bishop_and_queen_rays() {
        let pos = Position::from_fen("4k3/8/8/8/3B4/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "d4").len(), 13);
        let queen = Position::from_fen("4k3/8/8/8/3Q4/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(targets(&queen, "d4").len(), 27);
    }

    #[test]
    fn sliders_blocked_in_starting_position() {
        let pos = Position::starting();
        assert!(targets(&pos, "a1").is_empty());
        assert!(targets(&pos, "c1").is_empty());
        assert!(targets(&pos, "d1").is_empty());
    }

    #[test]
    fn king_steps_and_castling_candidates() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = pseudo_legal_moves(&pos, sq("e1"));
        assert!(moves.iter().any(|m| m.flags.is_castle_kingside() && m.to == sq("g1")));
        assert!(moves.iter().any(|m| m.flags.is_castle_queenside() && m.to == sq("c1")));
        assert_eq!(moves.len(), 7);
    }

    #[test]
    fn castling_needs_empty_path_and_flags() {
        let blocked = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        assert!(
            pseudo_legal_moves(&blocked, sq("e1"))
                .iter()
                .all(|m| !m.flags.is_castling())
        );
        let no_rights = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
        assert!(
            pseudo_legal_moves(&no_rights, sq("e1"))
                .iter()
                .all(|m| !m.flags.is_castling())
        );
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(pseudo_legal_moves(&Position::starting(), sq("e4")).is_empty());
    }
}
