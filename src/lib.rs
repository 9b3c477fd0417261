//! Chess rules and a minimax opponent for a turn-based game platform.
//!
//! - [`engine`]: board, move generation, legality, game state machine,
//!   notation and snapshots.
//! - [`ai`]: evaluation and alpha-beta search, plus the async runner.
//! - [`service`]: an in-process match store that drives both.

pub mod ai;
pub mod config;
pub mod engine;
pub mod service;
