//! Running a search off the async runtime.
//!
//! The search is CPU-bound, so it goes to tokio's blocking pool. A minimum
//! delay runs alongside it; the move is surfaced only once both finish.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tracing::debug;

use crate::engine::board::Position;
use crate::engine::types::{Color, Difficulty, Move};

use super::engine::AiEngine;

/// Search `pos` for `ai_color` on the blocking pool, taking at least
/// `min_delay`.
///
/// Yields `Ok(None)` when there is no move to play or `cancel` was raised
/// before the result was surfaced. A panic inside the search becomes `Err`.
pub async fn think(
    engine: Arc<dyn AiEngine>,
    pos: Position,
    ai_color: Color,
    difficulty: Difficulty,
    min_delay: Duration,
    cancel: Arc<AtomicBool>,
) -> Result<Option<Move>, JoinError> {
    let start = Instant::now();
    let flag = Arc::clone(&cancel);
    let search = tokio::task::spawn_blocking(move || {
        engine.best_move(&pos, ai_color, difficulty, &flag)
    });

    let (result, ()) = tokio::join!(search, tokio::time::sleep(min_delay));
    let mv = result?;

    if cancel.load(Ordering::Relaxed) {
        debug!(%ai_color, "AI search cancelled, discarding result");
        return Ok(None);
    }
    debug!(
        %ai_color,
        %difficulty,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "AI move ready"
    );
    Ok(mv)
}
