//! Web layer for the metro route planner.
//!
//! Provides HTTP endpoints for route search and the station list.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, cors_layer, create_router};
pub use state::AppState;
