use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use super::models::MonitorJob;
use super::worker::JobWorker;
use crate::error::{AppError, Result};
use crate::models::MonitorPayload;
use crate::monitor::{MonitorPipeline, PipelineSummary};

pub type CompletionSender = mpsc::UnboundedSender<(Uuid, PipelineSummary)>;

/// Hands accepted payloads to detached pipeline tasks.
///
/// `submit` never waits on pipeline work. Each job is spawned on its own task
/// as soon as the processor receives it; there is no concurrency cap and no
/// ordering between jobs.
#[derive(Clone)]
pub struct MonitorQueue {
    sender: mpsc::UnboundedSender<MonitorJob>,
}

impl MonitorQueue {
    pub fn new(pipeline: Arc<MonitorPipeline>) -> Self {
        Self::new_with_notifier(pipeline, None)
    }

    /// Like `new`, but every finished job's summary is also sent to `notifier`.
    pub fn new_with_notifier(
        pipeline: Arc<MonitorPipeline>,
        notifier: Option<CompletionSender>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            process_queue(receiver, pipeline, notifier).await;
        });

        Self { sender }
    }

    pub fn submit(&self, payload: MonitorPayload) -> Result<Uuid> {
        let job = MonitorJob::new(payload);
        let job_id = job.id;

        self.sender
            .send(job)
            .map_err(|_| AppError::Job("Failed to queue monitor job".to_string()))?;

        info!("Monitor job {} queued", job_id);
        Ok(job_id)
    }
}

async fn process_queue(
    mut receiver: mpsc::UnboundedReceiver<MonitorJob>,
    pipeline: Arc<MonitorPipeline>,
    notifier: Option<CompletionSender>,
) {
    info!("Monitor queue processor started");

    while let Some(job) = receiver.recv().await {
        let worker = JobWorker::new(pipeline.clone());
        let notifier = notifier.clone();

        tokio::spawn(async move {
            let job_id = job.id;
            let summary = worker.run(job).await;

            if let Some(notifier) = notifier {
                let _ = notifier.send((job_id, summary));
            }
        });
    }

    warn!("Monitor queue processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::Setting;
    use crate::monitor::DispatchOutcome;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pipeline() -> Arc<MonitorPipeline> {
        Arc::new(MonitorPipeline::from_config(&AppConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_submit_returns_before_pipeline_finishes() {
        let sites = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(500)))
            .mount(&sites)
            .await;

        let callback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&callback)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let queue = MonitorQueue::new_with_notifier(pipeline(), Some(tx));

        let job_id = queue
            .submit(MonitorPayload {
                channel_id: "c1".to_string(),
                return_url: callback.uri(),
                settings: vec![Setting::new("site-1", sites.uri())],
            })
            .unwrap();

        assert!(rx.try_recv().is_err());

        let (finished_id, summary) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(finished_id, job_id);
        assert_eq!(summary.report.failure_count(), 1);
        assert!(matches!(summary.dispatch, DispatchOutcome::Delivered(_)));
    }

    #[tokio::test]
    async fn test_jobs_run_independently() {
        let sites = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&sites)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let queue = MonitorQueue::new_with_notifier(pipeline(), Some(tx));

        for i in 0..3 {
            queue
                .submit(MonitorPayload {
                    channel_id: format!("c{}", i),
                    return_url: "http://127.0.0.1:9/unused".to_string(),
                    settings: vec![Setting::new("site-1", sites.uri())],
                })
                .unwrap();
        }

        let started = std::time::Instant::now();
        for _ in 0..3 {
            let (_, summary) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(summary.dispatch, DispatchOutcome::Skipped);
        }
        assert!(started.elapsed() < Duration::from_millis(900));
    }
}
