//! Boundary between raw user data and the engine.
//!
//! The engine assumes well-formed, non-negative input. Everything that loads
//! snapshots (CSV cohorts, JSON profiles, CLI flags) validates here first.

mod parser;

pub use parser::{
    load_contacts, load_funding_profile, load_revenue_streams, read_contacts, read_revenue_streams,
};

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{field} is required once {reason}")]
    Missing {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {record} rejected: {source}")]
    Invalid {
        record: String,
        #[source]
        source: ValidationError,
    },
    #[error("input contained no records")]
    Empty,
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

pub(crate) fn ensure_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let value = ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

pub(crate) fn ensure_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}
