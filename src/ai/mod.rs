pub mod engine;
pub mod evaluation;
pub mod runner;

pub use engine::{AiEngine, MinimaxAi, RandomAi, SearchStats, best_move, default_engine};
pub use evaluation::evaluate;
pub use runner::think;
