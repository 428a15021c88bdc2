//! Aggregate-then-dispatch sequence run for every accepted tick

use std::time::{Duration, Instant};

use super::aggregator::ResultAggregator;
use super::dispatcher::{DispatchOutcome, ReportDispatcher};
use super::prober::SiteProber;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{MonitorPayload, Report};

#[derive(Debug, Clone)]
pub struct MonitorPipeline {
    aggregator: ResultAggregator,
    dispatcher: ReportDispatcher,
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub sites_checked: usize,
    pub report: Report,
    pub dispatch: DispatchOutcome,
    pub duration: Duration,
}

impl MonitorPipeline {
    pub fn new(aggregator: ResultAggregator, dispatcher: ReportDispatcher) -> Self {
        Self {
            aggregator,
            dispatcher,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let prober = SiteProber::new(&config.probe)?;
        let aggregator = ResultAggregator::new(prober, config.report.clone());
        let dispatcher = ReportDispatcher::new(&config.dispatch)?;
        Ok(Self::new(aggregator, dispatcher))
    }

    pub async fn run(&self, payload: &MonitorPayload) -> PipelineSummary {
        let started = Instant::now();

        let report = self.aggregator.aggregate(payload).await;
        let dispatch = self.dispatcher.dispatch(&report, &payload.return_url).await;

        PipelineSummary {
            sites_checked: payload.sites().len(),
            report,
            dispatch,
            duration: started.elapsed(),
        }
    }
}
