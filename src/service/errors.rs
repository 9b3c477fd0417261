use tokio::task::JoinError;

use crate::engine::types::{ChessError, Rejection};

/// Failure of a match-store operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Chess(#[from] ChessError),

    #[error("AI task failed: {0}")]
    AiTask(String),
}

impl ServiceError {
    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MatchNotFound(_) => "MATCH_NOT_FOUND",
            ServiceError::Rejected(rejection) => rejection.code(),
            ServiceError::Chess(ChessError::InvalidFen(_)) => "INVALID_FEN",
            ServiceError::Chess(ChessError::InvalidSnapshot(_)) => "INVALID_SNAPSHOT",
            ServiceError::Chess(_) => "INVALID_REQUEST",
            ServiceError::AiTask(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JoinError> for ServiceError {
    fn from(err: JoinError) -> Self {
        ServiceError::AiTask(format!("AI task panicked: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Color, GameStatus};

    #[test]
    fn codes() {
        assert_eq!(
            ServiceError::MatchNotFound("abc".into()).code(),
            "MATCH_NOT_FOUND"
        );
        assert_eq!(
            ServiceError::from(ChessError::InvalidFen("bad".into())).code(),
            "INVALID_FEN"
        );
        assert_eq!(
            ServiceError::from(ChessError::InvalidSquare("z9".into())).code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            ServiceError::AiTask("boom".into()).code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn rejections_keep_their_code_and_message() {
        let err = ServiceError::from(Rejection::WrongTurn {
            expected: Color::Black,
        });
        assert_eq!(err.code(), "WRONG_TURN");
        assert_eq!(err.to_string(), "it is black's turn");

        let over = ServiceError::from(Rejection::GameOver(GameStatus::Stalemate));
        assert_eq!(over.code(), "GAME_OVER");
    }
}
