use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";

#[derive(Debug)]
pub enum TelemetryError {
    /// Filter directives from `origin` did not parse.
    InvalidDirectives {
        origin: &'static str,
        directives: String,
        source: ParseError,
    },
    /// A global subscriber was already installed.
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidDirectives {
                origin, directives, ..
            } => write!(f, "{origin} holds invalid log directives '{directives}'"),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "log subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidDirectives { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Builds the filter from `RUST_LOG` when set, else from `APP_LOG_LEVEL`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match env::var(RUST_LOG) {
        Ok(directives) if !directives.trim().is_empty() => parse_directives(RUST_LOG, directives),
        _ => parse_directives("APP_LOG_LEVEL", config.log_level.clone()),
    }
}

fn parse_directives(
    origin: &'static str,
    directives: String,
) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidDirectives {
        origin,
        directives,
        source,
    })
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}
