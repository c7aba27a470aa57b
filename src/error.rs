use crate::config::ConfigError;
use crate::engine::SimulationError;
use crate::input::{ImportError, ValidationError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Import(ImportError),
    Json(serde_json::Error),
    Validation(ValidationError),
    Simulation(SimulationError),
    UnknownEntity { kind: &'static str, id: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Json(err) => write!(f, "serialization error: {}", err),
            AppError::Validation(err) => write!(f, "invalid input: {}", err),
            AppError::Simulation(err) => write!(f, "simulation error: {}", err),
            AppError::UnknownEntity { kind, id } => write!(f, "no {} with id '{}'", kind, id),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Simulation(err) => Some(err),
            AppError::UnknownEntity { .. } => None,
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

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SimulationError> for AppError {
    fn from(value: SimulationError) -> Self {
        Self::Simulation(value)
    }
}
