//! Site liveness probing

use futures_util::FutureExt;
use reqwest::{redirect::Policy, Client, StatusCode, Url};
use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ProbeConfig;
use crate::error::Result;

/// Why a site was reported down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error {0}")]
    HttpStatus(StatusCode),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up,
    Down(ProbeFailure),
}

impl ProbeOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up)
    }

    /// Human readable line for a down site, `None` when the site is up.
    pub fn diagnostic(&self, site: &str) -> Option<String> {
        match self {
            ProbeOutcome::Up => None,
            ProbeOutcome::Down(failure) => Some(format!("{} is down: {}", site, failure)),
        }
    }

    fn from_status(status: StatusCode) -> Self {
        if (200..400).contains(&status.as_u16()) {
            ProbeOutcome::Up
        } else {
            ProbeOutcome::Down(ProbeFailure::HttpStatus(status))
        }
    }
}

/// Issues a single GET per site, following redirects.
///
/// The configured timeout bounds the whole probe. Connection failures are
/// re-attempted up to `max_retries` times inside that bound; HTTP error
/// statuses and timeouts are final.
#[derive(Debug, Clone)]
pub struct SiteProber {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl SiteProber {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = build_client(config.timeout(), config)?;
        Ok(Self::with_client(client, config.timeout(), config.max_retries)
            .with_retry_base_delay(config.retry_base_delay()))
    }

    pub fn with_client(client: Client, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client,
            timeout,
            max_retries,
            retry_base_delay: ProbeConfig::default().retry_base_delay(),
        }
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Never fails: every error, including a panic inside the request, becomes a `ProbeOutcome::Down`.
    pub async fn probe(&self, site: &str) -> ProbeOutcome {
        let attempt = AssertUnwindSafe(self.probe_with_retries(site)).catch_unwind();

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => ProbeOutcome::Down(ProbeFailure::Unexpected(panic_message(panic))),
            Err(_) => ProbeOutcome::Down(ProbeFailure::Timeout(self.timeout)),
        }
    }

    async fn probe_with_retries(&self, site: &str) -> ProbeOutcome {
        let url = match Url::parse(site) {
            Ok(url) => url,
            Err(e) => {
                return ProbeOutcome::Down(ProbeFailure::Unexpected(format!(
                    "invalid URL '{}': {}",
                    site, e
                )))
            }
        };

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(site = %site, status = status.as_u16(), attempt, "probe response received");
                    return ProbeOutcome::from_status(status);
                }
                Err(e) if is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    debug!(
                        site = %site,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = self.backoff(attempt).as_millis() as u64,
                        error = %e,
                        "connection failed, retrying"
                    );
                }
                Err(e) => return ProbeOutcome::Down(self.classify_error(&e)),
            }
        }
    }

    /// `base * 2^(attempt - 1)`; the outer timeout still caps the total wait.
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    fn classify_error(&self, error: &reqwest::Error) -> ProbeFailure {
        if error.is_timeout() {
            ProbeFailure::Timeout(self.timeout)
        } else if error.is_builder() || error.is_redirect() || error.is_decode() {
            ProbeFailure::Unexpected(error_chain(error))
        } else {
            ProbeFailure::Transport(error_chain(error))
        }
    }
}

/// Probes one site with a throwaway client and returns its diagnostic, if any.
pub async fn probe_site(site: &str, max_retries: u32, timeout: Duration) -> Option<String> {
    let outcome = match build_client(timeout, &ProbeConfig::default()) {
        Ok(client) => {
            SiteProber::with_client(client, timeout, max_retries)
                .probe(site)
                .await
        }
        Err(e) => ProbeOutcome::Down(ProbeFailure::Unexpected(e.to_string())),
    };

    outcome.diagnostic(site)
}

fn build_client(timeout: Duration, config: &ProbeConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.clone())
        .build()
}

fn is_retryable(error: &reqwest::Error) -> bool {
    error.is_connect() && !error.is_timeout()
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "probe task panicked".to_string()
    }
}
