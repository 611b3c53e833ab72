use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_APPLIED_CACHE_PATH: &str = ".job-board/applied_jobs.json";

/// Distinguishes runtime behavior for different stages of the client.
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

/// Top-level configuration for the applicant client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub client: ClientConfig,
    pub cache: CacheConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let api_base_url = parse_base_url(
            &env::var("APP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let request_timeout_secs = match env::var("APP_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout { value: raw }),
            },
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let session_cookie = non_empty_var("APP_SESSION_COOKIE");
        let csrf_token = non_empty_var("APP_CSRF_TOKEN");

        let applied_jobs_path = env::var("APP_APPLIED_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_APPLIED_CACHE_PATH));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            client: ClientConfig {
                api_base_url,
                request_timeout_secs,
                session_cookie,
                csrf_token,
            },
            cache: CacheConfig { applied_jobs_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidApiBaseUrl {
        value: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedApiBaseUrl {
            value: raw.to_string(),
        });
    }

    Ok(url)
}

/// Settings for talking to the job board backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub request_timeout_secs: u64,
    pub session_cookie: Option<String>,
    pub csrf_token: Option<String>,
}

impl ClientConfig {
    /// Client settings pointing at `base_url` with no credentials.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_cookie: None,
            csrf_token: None,
        })
    }

    pub fn override_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Location of the local applied-jobs cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub applied_jobs_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiBaseUrl {
        value: String,
        source: url::ParseError,
    },
    UnsupportedApiBaseUrl {
        value: String,
    },
    InvalidTimeout {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiBaseUrl { value, .. } => {
                write!(f, "APP_API_BASE_URL '{value}' is not a valid URL")
            }
            ConfigError::UnsupportedApiBaseUrl { value } => {
                write!(f, "APP_API_BASE_URL '{value}' must be an http(s) base URL")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "APP_REQUEST_TIMEOUT_SECS must be a positive number of seconds (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidApiBaseUrl { source, .. } => Some(source),
            ConfigError::UnsupportedApiBaseUrl { .. } | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}
