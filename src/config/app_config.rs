use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::Catalog;
use crate::infrastructure::generator::ProcessCommand;

/// Application configuration. Every section may be omitted.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub generator: GeneratorConfig,
    pub artifacts: ArtifactConfig,
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export, off unless enabled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    pub otlp_endpoint: String,
    pub service_name: String,
    /// 0.0 to 1.0
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// External generator executables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub ddl: CommandConfig,
    pub erd: CommandConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    fn dmsa(subcommand: &str) -> Self {
        Self {
            program: "dmsa".to_string(),
            args: vec![subcommand.to_string()],
        }
    }

    pub fn to_process_command(&self) -> ProcessCommand {
        ProcessCommand::new(self.program.clone(), self.args.clone())
    }
}

/// Diagram artifact storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub storage_dir: PathBuf,
    /// Release identifier embedded in artifact filenames
    pub generator_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ddl: CommandConfig::dmsa("ddl"),
            erd: CommandConfig::dmsa("erd"),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("instance"),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        config.try_deserialize()
    }
}

/// `APP__SECTION__KEY` overrides. Values are kept as strings and converted by
/// the field's type, so `APP__ARTIFACTS__GENERATOR_VERSION=1.0` stays "1.0".
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP").separator("__")
}
