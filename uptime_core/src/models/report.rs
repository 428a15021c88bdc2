//! Outbound report sent to the caller's return URL

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub message: String,
    pub username: String,
    pub event_name: String,
    pub status: String,
}

impl Report {
    /// Builds a report from diagnostics, one line per failing site.
    pub fn from_diagnostics<I>(diagnostics: I, labels: &ReportConfig) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let message = diagnostics.into_iter().collect::<Vec<_>>().join("\n");

        Self {
            message,
            username: labels.username.clone(),
            event_name: labels.event_name.clone(),
            status: labels.status.clone(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.message.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.message.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diagnostics_produce_empty_message() {
        let report = Report::from_diagnostics(Vec::new(), &ReportConfig::default());
        assert_eq!(report.message, "");
        assert!(!report.has_failures());
        assert_eq!(report.failure_count(), 0);
        assert_eq!(report.username, "Uptime Monitor");
        assert_eq!(report.event_name, "Uptime Check");
        assert_eq!(report.status, "success");
    }

    #[test]
    fn test_diagnostics_are_newline_joined() {
        let report = Report::from_diagnostics(
            vec!["a is down".to_string(), "b is down".to_string()],
            &ReportConfig::default(),
        );
        assert_eq!(report.message, "a is down\nb is down");
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_report_serializes_expected_fields() {
        let report = Report::from_diagnostics(vec!["x".to_string()], &ReportConfig::default());
        let value = serde_json::to_value(&report).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(value["message"], "x");
        assert_eq!(value["status"], "success");
    }
}
