use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::MonitorPayload;

/// One accepted tick waiting to run through the pipeline.
#[derive(Debug, Clone)]
pub struct MonitorJob {
    pub id: Uuid,
    pub payload: MonitorPayload,
    pub received_at: DateTime<Utc>,
}

impl MonitorJob {
    pub fn new(payload: MonitorPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            received_at: Utc::now(),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.payload.channel_id
    }

    /// Time spent between intake and the worker picking the job up.
    pub fn queued_for(&self) -> Duration {
        Utc::now() - self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Setting;

    #[test]
    fn test_queued_for_measures_from_intake() {
        let mut job = MonitorJob::new(MonitorPayload {
            channel_id: "c1".to_string(),
            return_url: "http://cb.test/x".to_string(),
            settings: vec![Setting::new("site-1", "http://a.test")],
        });
        assert!(job.queued_for() >= Duration::zero());

        job.received_at = Utc::now() - Duration::seconds(5);
        assert!(job.queued_for() >= Duration::seconds(5));
        assert_eq!(job.channel_id(), "c1");
    }
}
