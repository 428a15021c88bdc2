use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn handle_integration(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.descriptor.as_ref().clone())
}
