use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Serialize;

const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 30;

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
    pub analysis: AnalysisConfig,
    pub contact: ContactLinks,
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

        let timeout_secs = match non_blank_var("REUNION_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            None => DEFAULT_ANALYSIS_TIMEOUT_SECS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            analysis: AnalysisConfig {
                backend_url: non_blank_var("REUNION_API_URL"),
                api_key: non_blank_var("REUNION_API_KEY"),
                timeout: Duration::from_secs(timeout_secs),
            },
            contact: ContactLinks {
                instagram_url: non_blank_var("INSTAGRAM_DM_URL"),
                telegram_url: non_blank_var("TELEGRAM_DM_URL"),
            },
        })
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the remote analysis backend.
///
/// Both the URL and the key are optional at load time so the service can boot
/// without them; the analysis client refuses to issue a request until both are
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AnalysisConfig {
    pub fn new(backend_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            backend_url: Some(backend_url.into()),
            api_key: Some(api_key.into()),
            timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend_url.is_some() && self.api_key.is_some()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }
}

/// Direct-message links rendered in the consultation call-to-action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub instagram_url: Option<String>,
    pub telegram_url: Option<String>,
}

impl ContactLinks {
    pub fn has_any(&self) -> bool {
        self.instagram_url.is_some() || self.telegram_url.is_some()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "REUNION_API_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
