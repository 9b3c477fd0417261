//! Standard Algebraic Notation (SAN) generation and parsing.
//!
//! SAN examples: `e4`, `Nf3`, `Bxe5`, `O-O`, `e8=Q+`, `Raxd1#`.
//! Squares themselves render through [`Square::to_algebraic`].

use crate::engine::board::Position;
use crate::engine::legality;
use crate::engine::types::{ChessError, Move, PieceType, Square};

// =========================================================================
// SAN generation
// =========================================================================

/// Convert a move to SAN.
///
/// `legal_moves` is the full legal list for the position, used for
/// disambiguation. The `+`/`#` suffix is not added here; the game appends it
/// once the resulting status is known.
pub fn move_to_san(pos: &Position, mv: Move, legal_moves: &[Move]) -> String {
    if mv.flags.is_castle_kingside() {
        return "O-O".into();
    }
    if mv.flags.is_castle_queenside() {
        return "O-O-O".into();
    }

    let Some(piece) = pos.piece_at(mv.from) else {
        return mv.to_string();
    };

    let mut san = String::with_capacity(8);

    if piece.kind == PieceType::Pawn {
        if mv.flags.is_capture() {
            san.push(mv.from.file_char());
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(promo.letter());
        }
    } else {
        san.push(piece.kind.letter());
        san.push_str(&disambiguation(pos, mv, piece.kind, legal_moves));
        if mv.flags.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
    }

    san
}

/// File, rank or both, when another piece of the same kind can reach the
/// same square.
fn disambiguation(pos: &Position, mv: Move, kind: PieceType, legal_moves: &[Move]) -> String {
    let us = pos.side_to_move;
    let rivals: Vec<Square> = legal_moves
        .iter()
        .filter(|m| m.to == mv.to && m.from != mv.from && !m.flags.is_castling())
        .filter(|m| {
            pos.piece_at(m.from)
                .is_some_and(|p| p.color == us && p.kind == kind)
        })
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let same_file = rivals.iter().any(|s| s.col() == mv.from.col());
    let same_rank = rivals.iter().any(|s| s.row() == mv.from.row());

    match (same_file, same_rank) {
        (false, _) => mv.from.file_char().to_string(),
        (true, false) => mv.from.rank_char().to_string(),
        (true, true) => mv.from.to_algebraic(),
    }
}

// =========================================================================
// SAN parsing
// =========================================================================

/// Parse SAN into the matching legal move of `pos`.
///
/// Check, mate and annotation suffixes are ignored. Both `O-O` and `0-0`
/// spellings are accepted for castling.
pub fn parse_san(pos: &Position, san: &str) -> Result<Move, ChessError> {
    let legal = legality::all_legal_moves(pos);
    let trimmed = san.trim().trim_end_matches(['+', '#', '!', '?']);

    match trimmed {
        "O-O" | "0-0" => return find_castling(&legal, true, san),
        "O-O-O" | "0-0-0" => return find_castling(&legal, false, san),
        _ => {}
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.is_empty() {
        return Err(ChessError::InvalidSan("empty move".into()));
    }

    // Promotion suffix: "=Q" (the '=' is optional in the wild).
    let (chars, promotion) = match chars.as_slice() {
        [head @ .., '=', p] | [head @ .., p] if head.len() >= 2 && "QRBNqrbn".contains(*p) => {
            let kind = PieceType::from_letter(*p)
                .ok_or_else(|| ChessError::InvalidPromotion(p.to_string()))?;
            (head, Some(kind))
        }
        _ => (&chars[..], None),
    };

    let (kind, rest) = match chars.first() {
        Some(&c) if "NBRQK".contains(c) => match PieceType::from_letter(c) {
            Some(kind) => (kind, &chars[1..]),
            None => return Err(ChessError::InvalidSan(san.to_string())),
        },
        _ => (PieceType::Pawn, chars),
    };

    let rest: Vec<char> = rest.iter().copied().filter(|&c| c != 'x').collect();
    if rest.len() < 2 {
        return Err(ChessError::InvalidSan(san.to_string()));
    }

    let dest_str: String = rest[rest.len() - 2..].iter().collect();
    let dest = Square::from_algebraic(&dest_str).ok_or(ChessError::InvalidSquare(dest_str))?;

    // Disambiguation: at most one file and one rank, nothing else.
    let mut hint_col = None;
    let mut hint_row = None;
    for &c in &rest[..rest.len() - 2] {
        match c {
            'a'..='h' if hint_col.is_none() => hint_col = Some(c as u8 - b'a'),
            '1'..='8' if hint_row.is_none() => hint_row = Some(c as u8 - b'1'),
            _ => return Err(ChessError::InvalidSan(san.to_string())),
        }
    }

    let us = pos.side_to_move;
    let candidates: Vec<Move> = legal
        .iter()
        .copied()
        .filter(|m| m.to == dest && m.promotion == promotion)
        .filter(|m| {
            pos.piece_at(m.from)
                .is_some_and(|p| p.color == us && p.kind == kind)
        })
        .filter(|m| hint_col.is_none_or(|c| m.from.col() == c))
        .filter(|m| hint_row.is_none_or(|r| m.from.row() == r))
        .collect();

    match candidates.as_slice() {
        [only] => Ok(*only),
        [] => Err(ChessError::InvalidSan(format!("no legal move matches '{san}'"))),
        many => Err(ChessError::InvalidSan(format!(
            "ambiguous '{san}': {} candidates",
            many.len()
        ))),
    }
}

fn find_castling(legal: &[Move], kingside: bool, san: &str) -> Result<Move, ChessError> {
    legal
        .iter()
        .find(|m| {
            if kingside {
                m.flags.is_castle_kingside()
            } else {
                m.flags.is_castle_queenside()
            }
        })
        .copied()
        .ok_or_else(|| ChessError::InvalidSan(format!("castling not legal: '{san}'")))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::MoveFlags;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn san(fen: &str, from: &str, to: &str, flags: MoveFlags) -> String {
        let p = pos(fen);
        let legal = legality::all_legal_moves(&p);
        move_to_san(&p, Move::with_flags(sq(from), sq(to), flags), &legal)
    }

    // -------------------------------------------------------------------
    // Generation
    // -------------------------------------------------------------------

    #[test]
    fn san_pawn_push() {
        assert_eq!(
            san(crate::engine::board::STARTING_FEN, "e2", "e4", MoveFlags::DOUBLE_PUSH),
            "e4"
        );
    }

    #[test]
    fn san_pawn_capture() {
        assert_eq!(
            san(
                "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
                "e4",
                "d5",
                MoveFlags::CAPTURE
            ),
            "exd5"
        );
    }

    #[test]
    fn san_en_passant() {
        assert_eq!(
            san(
                "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
                "e5",
                "f6",
                MoveFlags::CAPTURE | MoveFlags::EN_PASSANT
            ),
            "exf6"
        );
    }

    #[test]
    fn san_pawn_promotion() {
        let p = pos("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let legal = legality::all_legal_moves(&p);
        let mv = Move::with_promotion(sq("e7"), sq("e8"), PieceType::Rook, MoveFlags::NONE);
        assert_eq!(move_to_san(&p, mv, &legal), "e8=R");
    }

    #[test]
    fn san_piece_moves() {
        assert_eq!(
            san(crate::engine::board::STARTING_FEN, "g1", "f3", MoveFlags::NONE),
            "Nf3"
        );
        assert_eq!(
            san(
                "rnbqk1nr/pppp1ppp/4p3/8/1b6/2N5/PPPPPPPP/R1BQKBNR b KQkq - 2 2",
                "b4",
                "c3",
                MoveFlags::CAPTURE
            ),
            "Bxc3"
        );
    }

    #[test]
    fn san_castling() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(san(fen, "e1", "g1", MoveFlags::CASTLE_KINGSIDE), "O-O");
        assert_eq!(san(fen, "e1", "c1", MoveFlags::CASTLE_QUEENSIDE), "O-O-O");
    }

    #[test]
    fn san_file_disambiguation() {
        assert_eq!(
            san("4k3/8/8/8/8/4K3/8/R6R w - - 0 1", "a1", "e1", MoveFlags::NONE),
            "Rae1"
        );
    }

    #[test]
    fn san_rank_disambiguation() {
        assert_eq!(
            san("R7/4k3/8/8/8/8/8/R3K3 w - - 0 1", "a1", "a4", MoveFlags::NONE),
            "R1a4"
        );
    }

    // -------------------------------------------------------------------
    // Parsing
    // -------------------------------------------------------------------

    #[test]
    fn parse_pawn_and_piece_moves() {
        let p = Position::starting();
        let e4 = parse_san(&p, "e4").unwrap();
        assert_eq!((e4.from, e4.to), (sq("e2"), sq("e4")));
        assert!(e4.flags.is_double_push());

        let nf3 = parse_san(&p, "Nf3").unwrap();
        assert_eq!((nf3.from, nf3.to), (sq("g1"), sq("f3")));
    }

    #[test]
    fn parse_castling_both_spellings() {
        let p = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert!(parse_san(&p, "O-O").unwrap().flags.is_castle_kingside());
        assert!(parse_san(&p, "0-0-0").unwrap().flags.is_castle_queenside());
        assert!(parse_san(&Position::starting(), "O-O").is_err());
    }

    #[test]
    fn parse_promotion() {
        let p = pos("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(
            parse_san(&p, "e8=Q").unwrap().promotion,
            Some(PieceType::Queen)
        );
        assert_eq!(
            parse_san(&p, "e8N").unwrap().promotion,
            Some(PieceType::Knight)
        );
    }

    #[test]
    fn parse_ignores_suffixes() {
        let p = pos("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        let mv = parse_san(&p, "Qh4#").unwrap();
        assert_eq!((mv.from, mv.to), (sq("d8"), sq("h4")));
    }

    #[test]
    fn parse_rejects_bad_input() {
        let p = Position::starting();
        assert!(matches!(parse_san(&p, "Qh5"), Err(ChessError::InvalidSan(_))));
        assert!(matches!(parse_san(&p, ""), Err(ChessError::InvalidSan(_))));
        assert!(parse_san(&p, "Nz9").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_hints() {
        let p = Position::starting();
        for san in ["N0f3", "N9f3", "Nzf3", "Ng1g1f3", "N?f3"] {
            assert!(
                matches!(parse_san(&p, san), Err(ChessError::InvalidSan(_))),
                "{san} should be rejected"
            );
        }
        // A valid hint still resolves.
        let mv = parse_san(&p, "Ngf3").unwrap();
        assert_eq!((mv.from, mv.to), (sq("g1"), sq("f3")));
    }

    #[test]
    fn round_trip_kiwipete() {
        let p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let legal = legality::all_legal_moves(&p);
        for mv in &legal {
            let text = move_to_san(&p, *mv, &legal);
            let parsed = parse_san(&p, &text).unwrap();
            assert_eq!(parsed, *mv, "round trip failed for '{text}'");
        }
    }
}
