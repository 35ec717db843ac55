//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ArtifactConfig, CommandConfig, GeneratorConfig, LogFormat, LoggingConfig,
    MetricsConfig, ObservabilityConfig, ServerConfig, TracingConfig,
};
