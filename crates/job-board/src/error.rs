use crate::config::ConfigError;
use crate::remote::RemoteError;
use crate::telemetry::TelemetryError;
use crate::workflows::application::{ServiceError, SubmitFailure, TransitionError};
use crate::workflows::applied::CacheError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Remote(RemoteError),
    Cache(CacheError),
    Application(ServiceError),
    Workflow(TransitionError),
    Submission(SubmitFailure),
    Answers(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Remote(err) => write!(f, "backend error: {}", err),
            AppError::Cache(err) => write!(f, "cache error: {}", err),
            AppError::Application(err) => write!(f, "application error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
            AppError::Submission(err) => write!(f, "submission failed: {}", err),
            AppError::Answers(err) => write!(f, "answer sheet error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Remote(err) => Some(err),
            AppError::Cache(err) => Some(err),
            AppError::Application(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Answers(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RemoteError> for AppError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<CacheError> for AppError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Application(value)
    }
}

impl From<TransitionError> for AppError {
    fn from(value: TransitionError) -> Self {
        Self::Workflow(value)
    }
}

impl From<SubmitFailure> for AppError {
    fn from(value: SubmitFailure) -> Self {
        Self::Submission(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Answers(value)
    }
}
