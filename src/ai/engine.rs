//! AI Engine: trait definition, RandomAi, and MinimaxAi.
//!
//! The `AiEngine` trait defines the interface for all AI engines.
//! Two implementations are provided:
//!   - `RandomAi` : plays a uniformly random legal move.
//!   - `MinimaxAi`: minimax with alpha-beta pruning, scored from the AI's
//!     fixed perspective. The weakest difficulty sometimes skips the search
//!     and delegates to `RandomAi`.
//!
//! Every search node works on its own copy of the position.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::engine::board::Position;
use crate::engine::legality::{all_legal_moves, has_any_legal_move, simulate};
use crate::engine::types::{Color, Difficulty, Move, Square};

use super::evaluation::{INF, MATE, evaluate};

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine: Send + Sync {
    /// Select a move for `ai_color`, which must be the side to move in `pos`.
    ///
    /// Returns `None` when there is no legal move, when it is not
    /// `ai_color`'s turn, or when `cancel` was raised during the search.
    fn best_move(
        &self,
        pos: &Position,
        ai_color: Color,
        difficulty: Difficulty,
        cancel: &AtomicBool,
    ) -> Option<Move>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// RandomAi
// =========================================================================

/// Picks a random legal move.
pub struct RandomAi;

impl AiEngine for RandomAi {
    fn best_move(
        &self,
        pos: &Position,
        ai_color: Color,
        _difficulty: Difficulty,
        _cancel: &AtomicBool,
    ) -> Option<Move> {
        if pos.side_to_move != ai_color {
            return None;
        }
        let moves = all_legal_moves(pos);
        moves.choose(&mut rand::thread_rng()).copied()
    }

    fn name(&self) -> &str {
        "RandomAi"
    }
}

// =========================================================================
// Move ordering
// =========================================================================

/// Distance of `sq` from the board centre, in half-squares (2 for d4/e5,
/// 14 for the corners).
#[inline]
fn center_distance(sq: Square) -> u8 {
    (2 * sq.row()).abs_diff(7) + (2 * sq.col()).abs_diff(7)
}

/// Captures first, then destinations closest to the centre. Ties keep
/// generation order.
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|m| (!m.flags.is_capture(), center_distance(m.to)));
}

// =========================================================================
// MinimaxAi: minimax with alpha-beta pruning
// =========================================================================

/// Search statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth: u32,
    pub score: i32,
    pub time_ms: u64,
    pub cancelled: bool,
}

/// State shared by every node of a single search.
struct SearchContext<'a> {
    perspective: Color,
    cancel: &'a AtomicBool,
    nodes: u64,
    aborted: bool,
}

impl<'a> SearchContext<'a> {
    fn new(perspective: Color, cancel: &'a AtomicBool) -> Self {
        Self {
            perspective,
            cancel,
            nodes: 0,
            aborted: false,
        }
    }

    #[inline]
    fn check_cancel(&mut self) -> bool {
        if !self.aborted && self.cancel.load(Ordering::Relaxed) {
            self.aborted = true;
        }
        self.aborted
    }
}

/// Pull a terminal score toward zero by `ply` so nearer mates rank higher.
#[inline]
fn mate_distance(score: i32, ply: u32) -> i32 {
    if score >= MATE {
        score - ply as i32
    } else if score <= -MATE {
        score + ply as i32
    } else {
        score
    }
}

/// Fifty-move or insufficient-material draw. Mate and stalemate take
/// precedence and are left to the caller. Repetition is not tracked here.
#[inline]
fn is_rule_draw(pos: &Position) -> bool {
    pos.halfmove_clock >= 100 || pos.board.is_insufficient_material()
}

/// Minimax with alpha-beta pruning.
///
/// Returns the score from the context's perspective: the perspective side
/// maximizes, its opponent minimizes.
fn minimax(
    pos: &Position,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    if ctx.check_cancel() {
        return 0;
    }
    ctx.nodes += 1;

    if depth == 0 {
        if is_rule_draw(pos) && has_any_legal_move(pos) {
            return 0;
        }
        return mate_distance(evaluate(pos, ctx.perspective), ply);
    }

    let mut moves = all_legal_moves(pos);
    if moves.is_empty() {
        return mate_distance(evaluate(pos, ctx.perspective), ply);
    }
    if is_rule_draw(pos) {
        return 0;
    }
    order_moves(&mut moves);

    let maximizing = pos.side_to_move == ctx.perspective;
    let mut best = if maximizing { -INF } else { INF };

    for mv in moves {
        let child = simulate(pos, mv);
        let score = minimax(&child, depth - 1, ply + 1, alpha, beta, ctx);
        if ctx.aborted {
            return best;
        }

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Minimax AI engine with alpha-beta pruning.
pub struct MinimaxAi {
    /// Overrides the difficulty's chance of playing a random move.
    random_move_probability: Option<f64>,
}

impl MinimaxAi {
    pub fn new() -> Self {
        Self {
            random_move_probability: None,
        }
    }

    /// Fix the random-move chance regardless of difficulty. `0.0` makes the
    /// engine fully deterministic.
    pub fn with_random_move_probability(probability: f64) -> Self {
        Self {
            random_move_probability: Some(probability.clamp(0.0, 1.0)),
        }
    }

    /// Run a fixed-depth search for the side to move. Returns (best_move, stats).
    pub fn search_fixed_depth(
        &self,
        pos: &Position,
        depth: u32,
        cancel: &AtomicBool,
    ) -> (Option<Move>, SearchStats) {
        let start = Instant::now();
        let mut ctx = SearchContext::new(pos.side_to_move, cancel);
        let depth = depth.max(1);

        let mut moves = all_legal_moves(pos);
        if moves.is_empty() {
            return (
                None,
                SearchStats {
                    nodes: 1,
                    depth,
                    ..SearchStats::default()
                },
            );
        }
        order_moves(&mut moves);

        let mut best_move = moves[0];
        let mut best_score = -INF;
        let mut alpha = -INF;

        for mv in &moves {
            let child = simulate(pos, *mv);
            let score = minimax(&child, depth - 1, 1, alpha, INF, &mut ctx);
            if ctx.aborted {
                break;
            }
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
            alpha = alpha.max(score);
        }

        let stats = SearchStats {
            nodes: ctx.nodes,
            depth,
            score: best_score,
            time_ms: start.elapsed().as_millis() as u64,
            cancelled: ctx.aborted,
        };
        if ctx.aborted {
            (None, stats)
        } else {
            (Some(best_move), stats)
        }
    }

    fn random_move_probability(&self, difficulty: Difficulty) -> f64 {
        self.random_move_probability
            .unwrap_or_else(|| difficulty.random_move_probability())
    }
}

impl Default for MinimaxAi {
    fn default() -> Self {
        Self::new()
    }
}

impl AiEngine for MinimaxAi {
    fn best_move(
        &self,
        pos: &Position,
        ai_color: Color,
        difficulty: Difficulty,
        cancel: &AtomicBool,
    ) -> Option<Move> {
        if pos.side_to_move != ai_color {
            debug!(%ai_color, "not the AI's turn, no move searched");
            return None;
        }

        let p = self.random_move_probability(difficulty);
        if p > 0.0 && rand::thread_rng().gen_bool(p) {
            debug!(%difficulty, "playing a random move");
            return RandomAi.best_move(pos, ai_color, difficulty, cancel);
        }

        let (best, stats) = self.search_fixed_depth(pos, difficulty.depth(), cancel);
        debug!(
            %ai_color,
            %difficulty,
            nodes = stats.nodes,
            score = stats.score,
            time_ms = stats.time_ms,
            cancelled = stats.cancelled,
            "search finished"
        );
        best
    }

    fn name(&self) -> &str {
        "MinimaxAi"
    }
}

/// Convenience: create the default AI engine.
pub fn default_engine() -> MinimaxAi {
    MinimaxAi::new()
}

/// Pick a move for `ai_color` with the default engine and no cancellation.
pub fn best_move(pos: &Position, ai_color: Color, difficulty: Difficulty) -> Option<Move> {
    default_engine().best_move(pos, ai_color, difficulty, &AtomicBool::new(false))
}

// =========================================================================
// Tests
// =========================================================================
