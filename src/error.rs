use std::io;
use thiserror::Error;

/// Failures at the I/O boundary of the audit tool: reading trip exports,
/// reading configuration and writing reports.
///
/// The reconciliation engine itself never produces these for bad trip data;
/// missing or malformed values degrade to "N/A" instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown trip status '{0}'")]
    UnknownStatus(String),

    #[error("No trip data available")]
    NoData,

    #[error("Trip '{0}' not found")]
    TripNotFound(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
