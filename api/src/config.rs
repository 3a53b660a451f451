//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::models::ReferenceMode;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default CMC bound (percent) used when a request does not supply one.
pub const DEFAULT_CMC_PERCENT: f64 = 1.0;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `CALBUDGET_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `CALBUDGET_PORT`: The port to listen on (default: 8080)
/// - `CALBUDGET_REFERENCE_MODE`: How reference uncertainties are read
///   (`certificate_halved` or `fraction_of_mean`, default: `certificate_halved`)
/// - `CALBUDGET_DEFAULT_CMC_PERCENT`: CMC bound used when a request omits it (default: 1.0)
/// - `CALBUDGET_SCOPE_FILE`: Optional JSON file with the accreditation scope
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Default interpretation of the reference standard's uncertainty.
    pub reference_mode: ReferenceMode,
    /// CMC bound applied when a request does not carry one.
    pub default_cmc_percent: f64,
    /// Accreditation scope file loaded at startup.
    pub scope_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `CALBUDGET_PORT` is set but cannot be parsed as a valid port number
    /// - `CALBUDGET_REFERENCE_MODE` is set to an unknown mode
    /// - `CALBUDGET_DEFAULT_CMC_PERCENT` is not a non-negative number
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("CALBUDGET_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("CALBUDGET_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("CALBUDGET_PORT must be a valid port number")?
            .unwrap_or(8080);

        let reference_mode = std::env::var("CALBUDGET_REFERENCE_MODE")
            .ok()
            .map(|m| m.parse::<ReferenceMode>())
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or_default();

        let default_cmc_percent = std::env::var("CALBUDGET_DEFAULT_CMC_PERCENT")
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .context("CALBUDGET_DEFAULT_CMC_PERCENT must be a number")?
            .unwrap_or(DEFAULT_CMC_PERCENT);
        if !default_cmc_percent.is_finite() || default_cmc_percent < 0.0 {
            anyhow::bail!("CALBUDGET_DEFAULT_CMC_PERCENT must be a non-negative number");
        }

        let scope_file = std::env::var("CALBUDGET_SCOPE_FILE")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            reference_mode,
            default_cmc_percent,
            scope_file,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            reference_mode: ReferenceMode::default(),
            default_cmc_percent: DEFAULT_CMC_PERCENT,
            scope_file: None,
        }
    }
}
