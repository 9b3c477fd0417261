//! In-process match registry.
//!
//! Every match lives behind one `RwLock`. Reads clone what they need and
//! release the lock; the AI search runs with no lock held and its move is
//! applied only if the game has not moved on in the meantime.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::ai::{self, AiEngine, MinimaxAi};
use crate::config::AppConfig;
use crate::engine::game::{GameState, MoveOutcome};
use crate::engine::snapshot::{FullGameSnapshot, GameSnapshot};
use crate::engine::types::{Difficulty, Move, MoveRequest, Rejection, Square};

use super::errors::ServiceError;
use super::models::AiMoveResponse;

struct MatchEntry {
    game: GameState,
    /// Cancellation flag of the AI search in flight, if any.
    ai_cancel: Option<Arc<AtomicBool>>,
}

impl MatchEntry {
    fn new(game: GameState) -> Self {
        MatchEntry {
            game,
            ai_cancel: None,
        }
    }

    fn cancel_ai(&mut self) -> bool {
        match self.ai_cancel.take() {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

/// Matches stored by UUID.
pub struct MatchStore {
    matches: RwLock<HashMap<String, MatchEntry>>,
    engine: Arc<dyn AiEngine>,
    pub config: AppConfig,
}

pub type SharedStore = Arc<MatchStore>;

impl MatchStore {
    pub fn new(config: AppConfig) -> Self {
        Self::with_engine(config, Arc::new(MinimaxAi::new()))
    }

    pub fn with_engine(config: AppConfig, engine: Arc<dyn AiEngine>) -> Self {
        MatchStore {
            matches: RwLock::new(HashMap::new()),
            engine,
            config,
        }
    }

    pub fn shared(config: AppConfig) -> SharedStore {
        Arc::new(Self::new(config))
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Start a match from the standard position; returns its id.
    pub async fn create_match(&self, white: &str, black: &str) -> String {
        self.insert(GameState::new(white, black)).await
    }

    pub async fn create_match_from_fen(
        &self,
        white: &str,
        black: &str,
        fen: &str,
    ) -> Result<String, ServiceError> {
        let game = GameState::from_fen(white, black, fen)?;
        Ok(self.insert(game).await)
    }

    /// Register a match rebuilt from a full snapshot under its original id.
    pub async fn restore_match(&self, full: FullGameSnapshot) -> Result<String, ServiceError> {
        let game = GameState::restore_full(full)?;
        Ok(self.insert(game).await)
    }

    async fn insert(&self, game: GameState) -> String {
        let id = game.id.clone();
        info!(
            match_id = %id,
            white = %game.players().white,
            black = %game.players().black,
            status = %game.status(),
            "match created"
        );
        self.matches
            .write()
            .await
            .insert(id.clone(), MatchEntry::new(game));
        id
    }

    /// Drop a match, cancelling any search in flight.
    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let mut matches = self.matches.write().await;
        let mut entry = matches
            .remove(id)
            .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
        entry.cancel_ai();
        info!(match_id = %id, "match removed");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.matches.read().await.is_empty()
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub async fn state(&self, id: &str) -> Result<GameSnapshot, ServiceError> {
        self.read(id, |game| game.snapshot()).await
    }

    pub async fn full_state(&self, id: &str) -> Result<FullGameSnapshot, ServiceError> {
        self.read(id, |game| game.full_snapshot()).await
    }

    pub async fn legal_moves_at(&self, id: &str, sq: Square) -> Result<Vec<Move>, ServiceError> {
        self.read(id, |game| game.legal_moves_at(sq)).await
    }

    /// Whether an AI search is running for this match.
    pub async fn ai_thinking(&self, id: &str) -> Result<bool, ServiceError> {
        let matches = self.matches.read().await;
        let entry = matches
            .get(id)
            .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
        Ok(entry.ai_cancel.is_some())
    }

    pub async fn pgn(&self, id: &str) -> Result<String, ServiceError> {
        self.read(id, |game| game.to_pgn()).await
    }

    async fn read<T>(&self, id: &str, f: impl FnOnce(&GameState) -> T) -> Result<T, ServiceError> {
        let matches = self.matches.read().await;
        let entry = matches
            .get(id)
            .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
        Ok(f(&entry.game))
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    pub async fn apply_move(
        &self,
        id: &str,
        identity: &str,
        request: MoveRequest,
    ) -> Result<MoveOutcome, ServiceError> {
        self.write(id, |entry| {
            let outcome = entry.game.apply_move(identity, request)?;
            log_move(id, identity, &outcome);
            Ok(outcome)
        })
        .await
    }

    pub async fn apply_san(
        &self,
        id: &str,
        identity: &str,
        san: &str,
    ) -> Result<MoveOutcome, ServiceError> {
        self.write(id, |entry| {
            let outcome = entry.game.apply_san(identity, san)?;
            log_move(id, identity, &outcome);
            Ok(outcome)
        })
        .await
    }

    pub async fn resign(&self, id: &str, identity: &str) -> Result<(), ServiceError> {
        self.write(id, |entry| {
            entry.game.resign(identity)?;
            entry.cancel_ai();
            info!(match_id = %id, %identity, winner = ?entry.game.winner(), "player resigned");
            Ok(())
        })
        .await
    }

    pub async fn offer_draw(&self, id: &str, identity: &str) -> Result<(), ServiceError> {
        self.write(id, |entry| {
            entry.game.offer_draw(identity)?;
            debug!(match_id = %id, %identity, "draw offered");
            Ok(())
        })
        .await
    }

    pub async fn accept_draw(&self, id: &str, identity: &str) -> Result<(), ServiceError> {
        self.write(id, |entry| {
            entry.game.accept_draw(identity)?;
            entry.cancel_ai();
            info!(match_id = %id, %identity, "draw agreed");
            Ok(())
        })
        .await
    }

    pub async fn decline_draw(&self, id: &str, identity: &str) -> Result<(), ServiceError> {
        self.write(id, |entry| {
            entry.game.decline_draw(identity)?;
            debug!(match_id = %id, %identity, "draw declined");
            Ok(())
        })
        .await
    }

    /// Raise the cancel flag of the search in flight. Returns whether one
    /// was running.
    pub async fn cancel_ai(&self, id: &str) -> Result<bool, ServiceError> {
        self.write(id, |entry| Ok(entry.cancel_ai())).await
    }

    async fn write<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut MatchEntry) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut matches = self.matches.write().await;
        let entry = matches
            .get_mut(id)
            .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
        f(entry)
    }

    // -----------------------------------------------------------------
    // AI
    // -----------------------------------------------------------------

    /// Let the AI move for the side to move, as that side's identity.
    ///
    /// `Ok(None)` means no move was played: the search was cancelled, found
    /// nothing, or the game changed while it ran.
    pub async fn play_ai_turn(
        &self,
        id: &str,
        difficulty: Option<Difficulty>,
    ) -> Result<Option<AiMoveResponse>, ServiceError> {
        let difficulty = difficulty.unwrap_or(self.config.default_difficulty);

        // Snapshot under the lock, search without it.
        let (pos, ai_color, identity, cancel) = {
            let mut matches = self.matches.write().await;
            let entry = matches
                .get_mut(id)
                .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
            if entry.game.is_game_over() {
                return Err(Rejection::GameOver(entry.game.status()).into());
            }
            entry.cancel_ai();
            let cancel = Arc::new(AtomicBool::new(false));
            entry.ai_cancel = Some(Arc::clone(&cancel));
            let color = entry.game.turn();
            (
                *entry.game.position(),
                color,
                entry.game.players().get(color).to_string(),
                cancel,
            )
        };

        let start = Instant::now();
        let chosen = ai::think(
            Arc::clone(&self.engine),
            pos,
            ai_color,
            difficulty,
            self.config.ai_min_delay(),
            Arc::clone(&cancel),
        )
        .await?;
        let thinking_time = start.elapsed().as_millis() as u64;

        let mut matches = self.matches.write().await;
        let entry = matches
            .get_mut(id)
            .ok_or_else(|| ServiceError::MatchNotFound(id.to_string()))?;
        if entry
            .ai_cancel
            .as_ref()
            .is_some_and(|flag| Arc::ptr_eq(flag, &cancel))
        {
            entry.ai_cancel = None;
        }

        let Some(ai_move) = chosen else {
            debug!(match_id = %id, %ai_color, "AI produced no move");
            return Ok(None);
        };
        if entry.game.is_game_over() || *entry.game.position() != pos {
            warn!(
                match_id = %id,
                %ai_color,
                %ai_move,
                "game changed during AI search, discarding move"
            );
            return Ok(None);
        }

        let outcome = entry.game.apply_move(&identity, ai_move.to_request())?;
        log_move(id, &identity, &outcome);
        Ok(Some(AiMoveResponse {
            ai_move,
            outcome,
            thinking_time,
        }))
    }
}

fn log_move(id: &str, identity: &str, outcome: &MoveOutcome) {
    debug!(
        match_id = %id,
        %identity,
        notation = %outcome.recorded_move.notation,
        status = %outcome.status,
        "move applied"
    );
    if outcome.status.is_game_over() {
        info!(
            match_id = %id,
            status = %outcome.status,
            winner = ?outcome.winner,
            draw_reason = ?outcome.draw_reason,
            "game over"
        );
    }
}
