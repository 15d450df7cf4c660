//! Layered service settings.
//!
//! Values resolve in this order, later sources winning:
//!
//! 1. Built-in defaults
//! 2. An optional settings file (TOML, YAML or JSON by extension)
//! 3. `FLEETWATCH_*` environment variables
//! 4. Command-line flags, including their `PORT` / `DEVICES_CSV` fallbacks

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6733;
pub const DEFAULT_DEVICES_CSV: &str = "devices.csv";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Prefix for environment overrides, e.g. `FLEETWATCH_LOG_FILTER=debug`.
pub const ENV_PREFIX: &str = "FLEETWATCH";

/// Resolved service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub devices_csv: PathBuf,
    pub log_filter: String,
    /// Prefix applied to exported metric names.
    #[serde(default)]
    pub metrics_namespace: Option<String>,
}

/// Values supplied on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub devices_csv: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Settings {
    /// Build settings from every layer.
    pub fn load(config_file: Option<&Path>, overrides: SettingsOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("devices_csv", DEFAULT_DEVICES_CSV)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("host", overrides.host)?
            .set_override_option("port", overrides.port.map(i64::from))?
            .set_override_option(
                "devices_csv",
                overrides.devices_csv.map(|p| p.display().to_string()),
            )?
            .set_override_option("log_filter", overrides.log_filter)?
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")?;

        Ok(settings)
    }

    /// Socket address the HTTP server binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid listen host '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
