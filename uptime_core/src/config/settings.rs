use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub probe: ProbeConfig,
    pub dispatch: DispatchConfig,
    pub report: ReportConfig,
    pub cors: CorsConfig,
    pub integration: IntegrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Per-site probe policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound for one probe, redirects and connection retries included.
    pub timeout_seconds: u64,
    /// Extra attempts made only when the connection itself cannot be established.
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each one after it.
    pub retry_base_delay_ms: u64,
    pub max_redirects: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub timeout_seconds: u64,
}

/// Fixed labels stamped on every outbound report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub username: String,
    pub event_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub app_name: String,
    pub app_description: String,
    pub app_logo: String,
    pub app_url: String,
    pub background_color: String,
    pub author: String,
    pub public_base_url: String,
    pub default_interval: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            probe: ProbeConfig::default(),
            dispatch: DispatchConfig::default(),
            report: ReportConfig::default(),
            cors: CorsConfig::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 2,
            retry_base_delay_ms: 200,
            max_redirects: 10,
            user_agent: format!("uptime-monitor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            username: "Uptime Monitor".to_string(),
            event_name: "Uptime Check".to_string(),
            status: "success".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://telex.im".to_string(),
                "https://staging.telex.im".to_string(),
                "http://telextest.im".to_string(),
                "http://staging.telextest.im".to_string(),
            ],
            max_age_seconds: 3600,
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            app_name: "Uptime Monitor".to_string(),
            app_description: "Checks a list of sites and reports the ones that are down".to_string(),
            app_logo: "https://uptime-monitor.osinachi.me/logo.png".to_string(),
            app_url: "https://uptime-monitor.osinachi.me".to_string(),
            background_color: "#fff".to_string(),
            author: "Osinachi Chukwujama".to_string(),
            public_base_url: "https://uptime-monitor.osinachi.me".to_string(),
            default_interval: "* * * * *".to_string(),
            created_at: "2025-02-09".to_string(),
            updated_at: "2025-02-09".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl DispatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.probe.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Probe timeout must be greater than 0".to_string(),
            ));
        }

        if self.dispatch.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Dispatch timeout must be greater than 0".to_string(),
            ));
        }

        if self.report.username.is_empty()
            || self.report.event_name.is_empty()
            || self.report.status.is_empty()
        {
            return Err(ConfigError::Message(
                "Report username, event name and status cannot be empty".to_string(),
            ));
        }

        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::Message(format!(
                "Invalid CORS origin: {}",
                origin
            )));
        }

        if self.integration.public_base_url.is_empty() {
            return Err(ConfigError::Message(
                "Integration public base URL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
