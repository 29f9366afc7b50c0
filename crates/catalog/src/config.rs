//! Configuration loading and validation for the catalog service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated catalog service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity attached to every emitted signal as `service.name`. **Required.**
    pub service_name: String,

    /// OTLP/gRPC collector endpoint shared by all signal exporters. **Required.**
    pub otel_exporter_otlp_endpoint: String,

    /// Transport security token. Only `"false"`, `"0"`, or `"f"`
    /// (case-insensitive) select the secure branch; anything else, including
    /// the default empty string, selects plaintext export.
    #[serde(default)]
    pub insecure_mode: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_http_port() -> u16 {
    8090
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// An empty `SERVICE_NAME` is rejected here: signals without a service
    /// identity cannot be attributed on the collector side, so the process
    /// refuses to start rather than export anonymous telemetry.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.service_name, "SERVICE_NAME")?;
        ensure_non_empty(&self.otel_exporter_otlp_endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
