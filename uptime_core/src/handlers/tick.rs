//! Intake for scheduler ticks

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::{error::Result, extractors::ValidatedJson, models::MonitorPayload, AppState};

/// Acknowledges with 202 as soon as the job is queued; the check runs afterwards.
pub async fn handle_tick(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MonitorPayload>,
) -> Result<impl IntoResponse> {
    let channel_id = payload.channel_id.clone();
    let sites = payload.sites().len();

    let job_id = state.monitor_queue.submit(payload)?;

    info!(
        job_id = %job_id,
        channel_id = %channel_id,
        sites,
        "POST /tick accepted"
    );

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "success" }))))
}
