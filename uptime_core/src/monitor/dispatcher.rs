//! Delivery of reports to the caller's return URL

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;
use crate::error::{AppError, Result};
use crate::models::Report;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every site was up, nothing was sent.
    Skipped,
    Delivered(StatusCode),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ReportDispatcher {
    client: Client,
}

impl ReportDispatcher {
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Posts the report once. Delivery errors are logged and reported in the
    /// outcome, never retried.
    pub async fn dispatch(&self, report: &Report, return_url: &str) -> DispatchOutcome {
        if !report.has_failures() {
            debug!(return_url = %return_url, "all sites up, skipping dispatch");
            return DispatchOutcome::Skipped;
        }

        match self.send(report, return_url).await {
            Ok(status) => {
                info!(
                    return_url = %return_url,
                    status = status.as_u16(),
                    failures = report.failure_count(),
                    "report delivered"
                );
                DispatchOutcome::Delivered(status)
            }
            Err(e) => {
                warn!(return_url = %return_url, error = %e, "report delivery failed");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn send(&self, report: &Report, return_url: &str) -> Result<StatusCode> {
        let response = self
            .client
            .post(return_url)
            .header(CONTENT_TYPE, "application/json")
            .json(report)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Dispatch(format!(
                "{} responded with {}",
                return_url, status
            )));
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn report(diagnostics: &[&str]) -> Report {
        Report::from_diagnostics(
            diagnostics.iter().map(|d| d.to_string()),
            &ReportConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_report_is_posted_as_json() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/return/c1"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "message": "http://bad.test is down: HTTP error 500 Internal Server Error",
                "username": "Uptime Monitor",
                "event_name": "Uptime Check",
                "status": "success"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock)
            .await;

        let dispatcher = ReportDispatcher::new(&DispatchConfig::default()).unwrap();
        let outcome = dispatcher
            .dispatch(
                &report(&["http://bad.test is down: HTTP error 500 Internal Server Error"]),
                &format!("{}/return/c1", mock.uri()),
            )
            .await;

        assert_eq!(outcome, DispatchOutcome::Delivered(StatusCode::ACCEPTED));
    }

    #[tokio::test]
    async fn test_empty_report_is_not_sent() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let dispatcher = ReportDispatcher::new(&DispatchConfig::default()).unwrap();
        let outcome = dispatcher.dispatch(&report(&[]), &mock.uri()).await;

        assert_eq!(outcome, DispatchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_rejected_delivery_is_not_retried() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock)
            .await;

        let dispatcher = ReportDispatcher::new(&DispatchConfig::default()).unwrap();
        let outcome = dispatcher.dispatch(&report(&["x is down"]), &mock.uri()).await;

        match outcome {
            DispatchOutcome::Failed(reason) => assert!(reason.contains("503")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_return_url_is_swallowed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatcher = ReportDispatcher::new(&DispatchConfig::default()).unwrap();
        let outcome = dispatcher
            .dispatch(&report(&["x is down"]), &format!("http://{}/return", addr))
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    }
}
