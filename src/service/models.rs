use serde::{Deserialize, Serialize};

use crate::engine::game::{GameState, MoveOutcome, RecordedMove};
use crate::engine::types::{Color, DrawReason, GameStatus, Move, Rejection};

use super::errors::ServiceError;

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl From<&Rejection> for ErrorDetail {
    fn from(rejection: &Rejection) -> Self {
        ErrorDetail {
            code: rejection.code().to_string(),
            message: rejection.to_string(),
        }
    }
}

impl From<&ServiceError> for ErrorDetail {
    fn from(err: &ServiceError) -> Self {
        ErrorDetail {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Flat result of a move attempt, as a transport would send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_move: Option<RecordedMove>,
    pub status: GameStatus,
    pub in_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_reason: Option<DrawReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl MoveResponse {
    /// A refused move. Status fields describe the unchanged game.
    pub fn rejected(game: &GameState, rejection: &Rejection) -> Self {
        MoveResponse {
            success: false,
            recorded_move: None,
            status: game.status(),
            in_check: game.in_check(),
            winner: game.winner(),
            draw_reason: game.draw_reason(),
            error: Some(rejection.into()),
        }
    }

    pub fn from_result(game: &GameState, result: Result<MoveOutcome, Rejection>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(rejection) => Self::rejected(game, &rejection),
        }
    }
}

impl From<MoveOutcome> for MoveResponse {
    fn from(outcome: MoveOutcome) -> Self {
        MoveResponse {
            success: true,
            recorded_move: Some(outcome.recorded_move),
            status: outcome.status,
            in_check: outcome.in_check,
            winner: outcome.winner,
            draw_reason: outcome.draw_reason,
            error: None,
        }
    }
}

/// A move the AI chose and played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveResponse {
    pub ai_move: Move,
    pub outcome: MoveOutcome,
    pub thinking_time: u64,
}
