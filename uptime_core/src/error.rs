//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job error: {0}")]
    Job(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Job(msg) => {
                tracing::error!("Job error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Monitor queue unavailable".to_string())
            }
            AppError::Dispatch(msg) => {
                tracing::error!("Dispatch error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Report delivery failed".to_string())
            }
            AppError::HttpClient(err) => {
                tracing::error!("HTTP client error: {:?}", err);
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| match &error.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: failed '{}' check", field, error.code),
                })
            })
            .collect();
        messages.sort();

        AppError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_validation_error_maps_to_422() {
        let response = AppError::Validation("return_url: must be a URL".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 422);
        assert_eq!(json["error"], "return_url: must be a URL");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = AppError::Job("channel closed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Monitor queue unavailable");
    }

    #[tokio::test]
    async fn test_io_error_maps_to_500() {
        let err: AppError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 500);
        assert_eq!(json["error"], "Internal server error");
    }
}
