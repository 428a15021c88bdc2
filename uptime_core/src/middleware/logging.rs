//! Request logging middleware configuration

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{info_span, Span};

/// Wraps the router in a `TraceLayer` that logs one line per response.
pub fn with_request_logging(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            })
            .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                let status = response.status();
                let latency_ms = latency.as_millis() as u64;

                if status.is_success() {
                    tracing::info!(status = status.as_u16(), latency_ms, "request completed");
                } else if status.is_client_error() {
                    tracing::warn!(status = status.as_u16(), latency_ms, "client error response");
                } else {
                    tracing::error!(status = status.as_u16(), latency_ms, "server error response");
                }
            })
            .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                tracing::error!(
                    latency_ms = latency.as_millis() as u64,
                    error = %error,
                    "request failed"
                );
            }),
    )
}
