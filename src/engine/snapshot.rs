//! Serializable views of a game and rehydration from them.
//!
//! [`GameSnapshot`] is what a client needs to render and continue a game.
//! [`FullGameSnapshot`] adds the move and position-key histories so a
//! restored game keeps its repetition record and PGN.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::board::{Board, Position, validate_kings};
use crate::engine::game::{GameState, Players, RecordedMove};
use crate::engine::types::{CastlingFlags, ChessError, Color, DrawReason, GameStatus, Square};

/// Current state of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub winner: Option<Color>,
    pub draw_reason: Option<DrawReason>,
    pub last_move: Option<RecordedMove>,
    pub move_count: usize,
    pub in_check: bool,
    pub players: Players,
    pub castling: CastlingFlags,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub draw_offer: Option<Color>,
    pub created_at: DateTime<Utc>,
}

/// A snapshot plus everything needed to resume the game exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullGameSnapshot {
    #[serde(flatten)]
    pub state: GameSnapshot,
    pub move_history: Vec<RecordedMove>,
    pub position_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_fen: Option<String>,
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        let pos = &self.position;
        GameSnapshot {
            id: self.id.clone(),
            board: pos.board,
            turn: pos.side_to_move,
            status: self.status,
            winner: self.winner,
            draw_reason: self.draw_reason,
            last_move: self.move_history.last().cloned(),
            move_count: self.move_history.len(),
            in_check: self.in_check(),
            players: self.players.clone(),
            castling: pos.castling,
            en_passant: pos.en_passant,
            halfmove_clock: pos.halfmove_clock,
            fullmove_number: pos.fullmove_number,
            draw_offer: self.draw_offer,
            created_at: self.created_at,
        }
    }

    pub fn full_snapshot(&self) -> FullGameSnapshot {
        FullGameSnapshot {
            state: self.snapshot(),
            move_history: self.move_history.clone(),
            position_keys: self.position_keys.clone(),
            starting_fen: self.starting_fen.clone(),
        }
    }

    /// Rebuild a game from a plain snapshot. History is not carried, so the
    /// repetition record restarts at the current position.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self, ChessError> {
        let key = snapshot.board.position_key(snapshot.turn);
        Self::rehydrate(snapshot, Vec::new(), vec![key], None)
    }

    /// Rebuild a game with its full history.
    pub fn restore_full(full: FullGameSnapshot) -> Result<Self, ChessError> {
        let FullGameSnapshot {
            state,
            move_history,
            position_keys,
            starting_fen,
        } = full;

        let current = state.board.position_key(state.turn);
        if position_keys.last() != Some(&current) {
            return Err(ChessError::InvalidSnapshot(
                "position history does not end at the current position".into(),
            ));
        }
        if move_history.len() != state.move_count {
            return Err(ChessError::InvalidSnapshot(format!(
                "move count {} does not match history length {}",
                state.move_count,
                move_history.len()
            )));
        }
        Self::rehydrate(state, move_history, position_keys, starting_fen)
    }

    fn rehydrate(
        snap: GameSnapshot,
        move_history: Vec<RecordedMove>,
        position_keys: Vec<String>,
        starting_fen: Option<String>,
    ) -> Result<Self, ChessError> {
        validate_kings(&snap.board).map_err(ChessError::InvalidSnapshot)?;
        if snap.fullmove_number == 0 {
            return Err(ChessError::InvalidSnapshot(
                "fullmove number must be >= 1".into(),
            ));
        }
        let mover = !snap.turn;
        if let Some(ep) = snap.en_passant
            && ep.row() as i8 != mover.pawn_row() as i8 + mover.forward()
        {
            return Err(ChessError::InvalidSnapshot(format!(
                "en passant square {ep} does not follow a double push"
            )));
        }

        Ok(GameState {
            position: Position {
                board: snap.board,
                side_to_move: snap.turn,
                castling: snap.castling,
                en_passant: snap.en_passant,
                halfmove_clock: snap.halfmove_clock,
                fullmove_number: snap.fullmove_number,
            },
            players: snap.players,
            move_history,
            position_keys,
            draw_offer: snap.draw_offer,
            status: snap.status,
            winner: snap.winner,
            draw_reason: snap.draw_reason,
            id: snap.id,
            created_at: snap.created_at,
            starting_fen,
        })
    }
}
