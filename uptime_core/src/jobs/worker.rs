use std::sync::Arc;
use tracing::{info, warn};

use super::models::MonitorJob;
use crate::monitor::{DispatchOutcome, MonitorPipeline, PipelineSummary};

/// Runs a single job through the pipeline on its own task.
pub struct JobWorker {
    pipeline: Arc<MonitorPipeline>,
}

impl JobWorker {
    pub fn new(pipeline: Arc<MonitorPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn run(self, job: MonitorJob) -> PipelineSummary {
        info!(
            job_id = %job.id,
            channel_id = %job.channel_id(),
            sites = job.payload.sites().len(),
            queued_ms = job.queued_for().num_milliseconds(),
            "monitor job started"
        );

        let summary = self.pipeline.run(&job.payload).await;
        let failures = summary.report.failure_count();

        match &summary.dispatch {
            DispatchOutcome::Skipped => info!(
                job_id = %job.id,
                sites = summary.sites_checked,
                duration_ms = summary.duration.as_millis() as u64,
                "monitor job finished, all sites up"
            ),
            DispatchOutcome::Delivered(status) => info!(
                job_id = %job.id,
                sites = summary.sites_checked,
                failures,
                status = status.as_u16(),
                duration_ms = summary.duration.as_millis() as u64,
                "monitor job finished, report delivered"
            ),
            DispatchOutcome::Failed(reason) => warn!(
                job_id = %job.id,
                sites = summary.sites_checked,
                failures,
                reason = %reason,
                duration_ms = summary.duration.as_millis() as u64,
                "monitor job finished, report not delivered"
            ),
        }

        summary
    }
}
