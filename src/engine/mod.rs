pub mod board;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod notation;
pub mod pgn;
pub mod snapshot;
pub mod types;

pub use board::{Board, Position};
pub use game::{GameState, MoveOutcome, Players, RecordedMove, SpecialMove};
pub use legality::{all_legal_moves, is_in_check, is_square_attacked, legal_moves_from};
pub use snapshot::{FullGameSnapshot, GameSnapshot};
pub use types::*;
