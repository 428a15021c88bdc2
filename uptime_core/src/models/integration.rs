//! Self-description document served at `/integration.json`

use serde::Serialize;

use super::payload::Setting;
use crate::config::IntegrationConfig;

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationDescriptor {
    pub data: IntegrationData,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationData {
    pub date: IntegrationDates,
    pub descriptions: IntegrationDescriptions,
    pub is_active: bool,
    pub integration_type: String,
    pub key_features: Vec<String>,
    pub author: String,
    pub settings: Vec<Setting>,
    pub target_url: String,
    pub tick_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationDates {
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationDescriptions {
    pub app_name: String,
    pub app_description: String,
    pub app_logo: String,
    pub app_url: String,
    pub background_color: String,
}

impl IntegrationDescriptor {
    pub fn from_config(config: &IntegrationConfig) -> Self {
        let base_url = config.public_base_url.trim_end_matches('/');

        let settings = vec![
            Setting::new("site-1", ""),
            Setting::new("site-2", ""),
            Setting::new("interval", config.default_interval.clone()),
        ];

        Self {
            data: IntegrationData {
                date: IntegrationDates {
                    created_at: config.created_at.clone(),
                    updated_at: config.updated_at.clone(),
                },
                descriptions: IntegrationDescriptions {
                    app_name: config.app_name.clone(),
                    app_description: config.app_description.clone(),
                    app_logo: config.app_logo.clone(),
                    app_url: config.app_url.clone(),
                    background_color: config.background_color.clone(),
                },
                is_active: true,
                integration_type: "checkbox".to_string(),
                key_features: vec![
                    "- monitors websites".to_string(),
                    "- reports only the sites that are down".to_string(),
                ],
                author: config.author.clone(),
                settings,
                target_url: String::new(),
                tick_url: format!("{}/tick", base_url),
            },
        }
    }
}
