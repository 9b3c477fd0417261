use std::time::Duration;

use crate::engine::types::Difficulty;

/// Runtime configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AI difficulty used when a caller does not pick one.
    pub default_difficulty: Difficulty,
    /// Minimum time an AI turn takes, in milliseconds.
    pub ai_min_delay_ms: u64,
    /// Ply cap for the self-play demo.
    pub self_play_max_plies: usize,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            default_difficulty: std::env::var("CHESS_AI_DEFAULT_DIFFICULTY")
                .ok()
                .and_then(|v| Difficulty::from_str_loose(&v))
                .unwrap_or(defaults.default_difficulty),
            ai_min_delay_ms: std::env::var("CHESS_AI_MIN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ai_min_delay_ms),
            self_play_max_plies: std::env::var("CHESS_SELF_PLAY_MAX_PLIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.self_play_max_plies),
        }
    }

    pub fn ai_min_delay(&self) -> Duration {
        Duration::from_millis(self.ai_min_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_difficulty: Difficulty::Medium,
            ai_min_delay_ms: 500,
            self_play_max_plies: 200,
        }
    }
}
