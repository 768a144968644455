//! Service configuration.
//!
//! Values come from defaults, an optional TOML file, environment
//! variables (case-insensitive names) and finally command-line flags.
//! The result is validated once and shared read-only.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Pre-production.
    Staging,
    /// Production.
    Production,
}

impl Environment {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "'{other}' is not one of development, staging, production"
            )),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log verbosity, named after the conventional syslog-style levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warning,
    /// Errors only.
    Error,
    /// Errors only (tracing has no level above error).
    Critical,
}

impl LogLevel {
    /// Uppercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Equivalent `tracing` filter directive.
    pub fn tracing_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(format!(
                "'{other}' is not one of DEBUG, INFO, WARNING, ERROR, CRITICAL"
            )),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    // `Self::Error` would collide with the `LogLevel::Error` variant.
    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Listen address (IP literal or `localhost`).
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Log verbosity when `RUST_LOG` is unset.
    pub log_level: LogLevel,
    /// `*` or a comma-separated list of allowed origins.
    pub cors_origins: String,
    /// API version segment, e.g. `v1`.
    pub api_version: String,
    /// Path prefix in front of the version, e.g. `/api`.
    pub api_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: LogLevel::Info,
            cors_origins: "*".to_string(),
            api_version: "v1".to_string(),
            api_prefix: "/api".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: ServiceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(std::env::vars())
    }

    /// Applies `(name, value)` overrides. Names are matched
    /// case-insensitively; unrelated names are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref().to_ascii_uppercase().as_str() {
                "ENVIRONMENT" => {
                    self.environment =
                        value
                            .parse::<Environment>()
                            .map_err(|reason| ConfigError::InvalidValue {
                                key: "ENVIRONMENT",
                                reason,
                            })?;
                }
                "HOST" => self.host = value.trim().to_string(),
                "PORT" => {
                    self.port = value.trim().parse::<u16>().map_err(|e| {
                        ConfigError::InvalidValue {
                            key: "PORT",
                            reason: e.to_string(),
                        }
                    })?;
                }
                "LOG_LEVEL" => {
                    self.log_level =
                        value
                            .parse::<LogLevel>()
                            .map_err(|reason| ConfigError::InvalidValue {
                                key: "LOG_LEVEL",
                                reason,
                            })?;
                }
                "CORS_ORIGINS" => self.cors_origins = value.to_string(),
                "API_VERSION" => self.api_version = value.trim().to_string(),
                "API_PREFIX" => self.api_prefix = value.trim().to_string(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host_ip()?;
        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(ConfigError::InvalidValue {
                key: "API_VERSION",
                reason: format!("'{}' must be a single non-empty path segment", self.api_version),
            });
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "API_PREFIX",
                reason: format!("'{}' must start with '/'", self.api_prefix),
            });
        }
        if self.cors_origins_list().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ORIGINS",
                reason: "no origins given".to_string(),
            });
        }
        Ok(())
    }

    /// Allowed CORS origins; `["*"]` means any.
    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins.trim() == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether the service runs in production.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Mount point of the domain routes, e.g. `/api/v1`.
    pub fn api_base_path(&self) -> String {
        format!("{}/{}", self.api_prefix.trim_end_matches('/'), self.api_version)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.host_ip()?, self.port))
    }

    fn host_ip(&self) -> Result<IpAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        self.host.parse().map_err(|_| ConfigError::InvalidValue {
            key: "HOST",
            reason: format!("'{}' is not an IP address", self.host),
        })
    }
}
