pub mod errors;
pub mod models;
pub mod store;

pub use errors::ServiceError;
pub use models::{AiMoveResponse, ErrorDetail, MoveResponse};
pub use store::{MatchStore, SharedStore};
