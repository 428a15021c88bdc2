//! Route table

use axum::{
    routing::{get, post},
    Router,
};

use super::{health::handle_health, integration::handle_integration, tick::handle_tick};
use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/integration.json", get(handle_integration))
        .route("/tick", post(handle_tick))
        .route("/health", get(handle_health))
}
