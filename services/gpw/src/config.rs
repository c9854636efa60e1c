//! Runtime configuration: logging setup and GDAL tool locations.

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cog::ToolConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "GPW_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "GPW_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl LogArgs {
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Install the global subscriber. `RUST_LOG` wins over `--log-level`.
    pub fn init_tracing(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().to_string()));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr);

        match self.log_format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.try_init(),
        }
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
    }
}

/// Overrides for the GDAL executables.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// gdal_translate executable
    #[arg(long, global = true)]
    pub gdal_translate: Option<String>,

    /// gdal_retile.py executable
    #[arg(long, global = true)]
    pub gdal_retile: Option<String>,

    /// gdalwarp executable
    #[arg(long, global = true)]
    pub gdalwarp: Option<String>,
}

impl ToolArgs {
    /// Flags first, then `GPW_GDAL_*` variables, then the executables on `PATH`.
    pub fn resolve(&self) -> ToolConfig {
        let mut config = ToolConfig::from_env();
        if let Some(path) = &self.gdal_translate {
            config.gdal_translate = path.clone();
        }
        if let Some(path) = &self.gdal_retile {
            config.gdal_retile = path.clone();
        }
        if let Some(path) = &self.gdalwarp {
            config.gdalwarp = path.clone();
        }
        config
    }
}
