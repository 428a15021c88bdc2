//! Inbound tick payload

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Label prefix that marks a setting as a monitor target.
pub const SITE_LABEL_PREFIX: &str = "site";

/// One configurable field of the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub label: String,
    #[serde(rename = "type", default = "default_setting_type")]
    pub setting_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: String,
}

fn default_setting_type() -> String {
    "text".to_string()
}

impl Setting {
    pub fn new(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            setting_type: default_setting_type(),
            required: true,
            default: default.into(),
        }
    }

    pub fn is_site(&self) -> bool {
        self.label.starts_with(SITE_LABEL_PREFIX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MonitorPayload {
    #[validate(length(min = 1, message = "channel_id cannot be empty"))]
    pub channel_id: String,
    #[validate(url(message = "return_url must be a valid URL"))]
    pub return_url: String,
    pub settings: Vec<Setting>,
}

impl MonitorPayload {
    /// Addresses to probe, in settings order.
    pub fn sites(&self) -> Vec<String> {
        self.settings
            .iter()
            .filter(|setting| setting.is_site())
            .map(|setting| setting.default.clone())
            .collect()
    }
}
