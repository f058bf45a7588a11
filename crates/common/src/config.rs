//! Application configuration.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Shuttle service configuration.
    pub service: ServiceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Shuttle service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// IANA time zone the vote cutoffs are evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Display name of the shuttle service.
    #[serde(default = "default_service_name")]
    pub name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_timezone() -> String {
    "America/Fortaleza".to_string()
}

fn default_service_name() -> String {
    "UniVan".to_string()
}

impl ServiceConfig {
    /// Parses the configured time zone, falling back to UTC on an
    /// unrecognized name.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %self.timezone, "Unknown time zone, falling back to UTC");
            Tz::UTC
        })
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `UNIVAN_ENV`)
    /// 3. Environment variables with `UNIVAN_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("UNIVAN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("UNIVAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("UNIVAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_parses_iana_name() {
        let service = ServiceConfig {
            timezone: "America/Fortaleza".to_string(),
            name: "UniVan".to_string(),
        };
        assert_eq!(service.timezone(), chrono_tz::America::Fortaleza);
    }

    #[test]
    fn test_timezone_falls_back_to_utc() {
        let service = ServiceConfig {
            timezone: "Not/AZone".to_string(),
            name: "UniVan".to_string(),
        };
        assert_eq!(service.timezone(), Tz::UTC);
    }
}
