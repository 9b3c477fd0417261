//! Behavioural checks on the alpha-beta search.

use std::sync::atomic::AtomicBool;

use chess_core::ai::{AiEngine, MinimaxAi};
use chess_core::engine::board::Position;
use chess_core::engine::legality::{all_legal_moves, is_in_check, simulate};
use chess_core::engine::types::{Color, Difficulty, Move, PieceType};

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

/// Deterministic engine: never plays a random move.
fn engine() -> MinimaxAi {
    MinimaxAi::with_random_move_probability(0.0)
}

fn choose(pos: &Position, difficulty: Difficulty) -> Move {
    engine()
        .best_move(pos, pos.side_to_move, difficulty, &AtomicBool::new(false))
        .expect("a legal move exists")
}

fn is_checkmate(pos: &Position) -> bool {
    all_legal_moves(pos).is_empty() && is_in_check(&pos.board, pos.side_to_move)
}

/// Can the side to move in `pos` mate in one?
fn has_mate_in_one(pos: &Position) -> bool {
    all_legal_moves(pos)
        .into_iter()
        .any(|mv| is_checkmate(&simulate(pos, mv)))
}

#[test]
fn finds_mate_in_one() {
    let p = pos("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    for difficulty in [Difficulty::Medium, Difficulty::Hard, Difficulty::Expert] {
        let mv = choose(&p, difficulty);
        assert!(is_checkmate(&simulate(&p, mv)), "{difficulty} played {mv}");
    }
}

#[test]
fn expert_parries_back_rank_mate() {
    // Black threatens ...Re1#.
    let p = pos("4r1k1/R4ppp/8/8/8/8/5PPP/6K1 w - - 0 1");
    let moves = all_legal_moves(&p);
    let losing = moves
        .iter()
        .filter(|&&mv| has_mate_in_one(&simulate(&p, mv)))
        .count();
    assert!(losing > 0 && losing < moves.len());

    let mv = choose(&p, Difficulty::Expert);
    assert!(
        !has_mate_in_one(&simulate(&p, mv)),
        "{mv} allows a back-rank mate"
    );
}

#[test]
fn expert_finds_the_only_defence() {
    // Rook check on the first rank: Bd1 loses to ...Rxd1#, Bf1 holds.
    let p = pos("6k1/5ppp/8/8/8/8/4BPPP/r5K1 w - - 0 1");
    let moves = all_legal_moves(&p);
    let safe: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|&mv| !has_mate_in_one(&simulate(&p, mv)))
        .collect();
    assert_eq!(safe.len(), 1, "expected a single defence, got {safe:?}");

    assert_eq!(choose(&p, Difficulty::Expert), safe[0]);
}

#[test]
fn attacked_queen_is_not_left_hanging() {
    // The e5 pawn attacks the queen; e5 and d6 are both defended.
    let p = pos("6k1/2p2ppp/3p4/4p3/3Q4/8/5PPP/6K1 w - - 0 1");
    for difficulty in [Difficulty::Medium, Difficulty::Hard, Difficulty::Expert] {
        let mv = choose(&p, difficulty);
        let after = simulate(&p, mv);
        let queen_lost = all_legal_moves(&after).into_iter().any(|reply| {
            after
                .piece_at(reply.to)
                .is_some_and(|piece| piece.kind == PieceType::Queen)
        });
        assert!(!queen_lost, "{difficulty} played {mv} and hangs the queen");
    }
}

#[test]
fn every_difficulty_plays_a_legal_move() {
    let p = pos("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let legal = all_legal_moves(&p);
    for difficulty in Difficulty::ALL {
        let mv = MinimaxAi::new()
            .best_move(&p, Color::White, difficulty, &AtomicBool::new(false))
            .unwrap();
        assert!(legal.contains(&mv), "{difficulty} played illegal {mv}");
    }
}

#[test]
fn no_move_when_mated_or_out_of_turn() {
    let mated = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    let cancel = AtomicBool::new(false);
    assert!(
        engine()
            .best_move(&mated, Color::White, Difficulty::Expert, &cancel)
            .is_none()
    );
    assert!(
        engine()
            .best_move(&Position::starting(), Color::Black, Difficulty::Easy, &cancel)
            .is_none()
    );
}
