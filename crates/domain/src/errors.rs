//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Frontdesk
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FrontdeskError {
    /// Calendar backend unreachable or rejected our credentials. Transient;
    /// surfaced to the caller as a retry-inviting apology.
    #[error("Calendar unavailable: {0}")]
    CalendarUnavailable(String),

    /// Calendar refused the write (permissions, quota). Booking must not be
    /// assumed to have succeeded.
    #[error("Calendar write rejected: {0}")]
    CalendarWriteRejected(String),

    /// A query interval with start >= end, or an otherwise malformed range.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FrontdeskError {
    /// Stable label for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CalendarUnavailable(_) => "calendar_unavailable",
            Self::CalendarWriteRejected(_) => "calendar_write_rejected",
            Self::InvalidRange(_) => "invalid_range",
            Self::InvalidInput(_) => "invalid_input",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Frontdesk operations
pub type Result<T> = std::result::Result<T, FrontdeskError>;
