use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::tracking::{
    PriorityConfig, PriorityConfigError, DEFAULT_BASE_PRIORITY, DEFAULT_VISIT_INTERVAL_MIN,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scheduling: PriorityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_priority = match env::var("DROPPOINT_BASE_VISIT_PRIORITY") {
            Ok(value) => value
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidBasePriority)?,
            Err(_) => DEFAULT_BASE_PRIORITY,
        };
        let visit_interval_minutes = match env::var("DROPPOINT_BASE_VISIT_INTERVAL_MIN") {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidVisitInterval)?,
            Err(_) => DEFAULT_VISIT_INTERVAL_MIN,
        };
        let scheduling = PriorityConfig::from_minutes(base_priority, visit_interval_minutes)
            .map_err(ConfigError::Scheduling)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scheduling,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBasePriority,
    InvalidVisitInterval,
    Scheduling(PriorityConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBasePriority => {
                write!(f, "DROPPOINT_BASE_VISIT_PRIORITY must be a number")
            }
            ConfigError::InvalidVisitInterval => {
                write!(f, "DROPPOINT_BASE_VISIT_INTERVAL_MIN must be an integer")
            }
            ConfigError::Scheduling(err) => write!(f, "scheduling config rejected: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidBasePriority
            | ConfigError::InvalidVisitInterval => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scheduling(source) => Some(source),
        }
    }
}
