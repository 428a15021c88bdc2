//! Application configuration

pub mod settings;

pub use settings::{
    AppConfig, CorsConfig, DispatchConfig, IntegrationConfig, ProbeConfig, ReportConfig,
    ServerConfig,
};
