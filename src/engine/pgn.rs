//! PGN (Portable Game Notation) export.
//!
//! Produces PGN with the Seven Tag Roster and move text with move numbers.

use crate::engine::game::GameState;
use crate::engine::types::{Color, GameStatus};

const LINE_WIDTH: usize = 80;

// =========================================================================
// PGN generation
// =========================================================================

/// Export a game as a PGN string.
pub fn to_pgn(game: &GameState) -> String {
    let mut pgn = String::with_capacity(512);
    let result = result_string(game);
    let players = game.players();

    // Seven Tag Roster.
    let date = game.created_at.format("%Y.%m.%d");
    pgn.push_str("[Event \"Casual Game\"]\n");
    pgn.push_str("[Site \"chess-core\"]\n");
    pgn.push_str(&format!("[Date \"{date}\"]\n"));
    pgn.push_str("[Round \"-\"]\n");
    pgn.push_str(&format!("[White \"{}\"]\n", players.white));
    pgn.push_str(&format!("[Black \"{}\"]\n", players.black));
    pgn.push_str(&format!("[Result \"{result}\"]\n"));

    if let Some(fen) = game.starting_fen() {
        pgn.push_str("[SetUp \"1\"]\n");
        pgn.push_str(&format!("[FEN \"{fen}\"]\n"));
    }
    pgn.push('\n');

    // Move text. The first mover and move number come from the history itself.
    let mut tokens = Vec::with_capacity(game.move_history().len() + 1);
    let mut move_num = first_move_number(game);
    for (i, record) in game.move_history().iter().enumerate() {
        let token = match record.color() {
            Color::White => format!("{move_num}. {}", record.notation),
            Color::Black if i == 0 => format!("{move_num}... {}", record.notation),
            Color::Black => record.notation.clone(),
        };
        if record.color() == Color::Black {
            move_num += 1;
        }
        tokens.push(token);
    }
    tokens.push(result.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + token.len() + 1 > LINE_WIDTH {
            pgn.push_str(&line);
            pgn.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    pgn.push_str(&line);
    pgn.push('\n');

    pgn
}

/// PGN result token.
fn result_string(game: &GameState) -> &'static str {
    match game.status() {
        GameStatus::Checkmate | GameStatus::Resigned => match game.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "*",
        },
        GameStatus::Stalemate | GameStatus::Draw => "1/2-1/2",
        GameStatus::Playing | GameStatus::Check => "*",
    }
}

fn first_move_number(game: &GameState) -> u32 {
    game.starting_fen()
        .and_then(|fen| fen.split_whitespace().nth(5))
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
}

// =========================================================================
// Tests
// =========================================================================
