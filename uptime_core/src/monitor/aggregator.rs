//! Concurrent fan-out over a payload's sites

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use super::prober::{ProbeOutcome, SiteProber};
use crate::config::ReportConfig;
use crate::models::{MonitorPayload, Report};

#[derive(Debug, Clone)]
pub struct ResultAggregator {
    prober: SiteProber,
    labels: ReportConfig,
}

impl ResultAggregator {
    pub fn new(prober: SiteProber, labels: ReportConfig) -> Self {
        Self { prober, labels }
    }

    /// Probes every site concurrently and yields one outcome per site in completion order.
    pub async fn probe_all(&self, sites: &[String]) -> Vec<(String, ProbeOutcome)> {
        let mut probes: FuturesUnordered<_> = sites
            .iter()
            .map(|site| async move {
                let outcome = self.prober.probe(site).await;
                (site.clone(), outcome)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(sites.len());
        while let Some((site, outcome)) = probes.next().await {
            debug!(site = %site, up = outcome.is_up(), "probe finished");
            outcomes.push((site, outcome));
        }

        outcomes
    }

    pub async fn aggregate(&self, payload: &MonitorPayload) -> Report {
        let sites = payload.sites();
        let outcomes = self.probe_all(&sites).await;

        let diagnostics = outcomes
            .iter()
            .filter_map(|(site, outcome)| outcome.diagnostic(site));

        Report::from_diagnostics(diagnostics, &self.labels)
    }
}
