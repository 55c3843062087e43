use std::fmt;

use thiserror::Error;

/// Error type returned by every plan operation.
#[derive(Debug, Error)]
pub enum SavingsError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Plan not found: {0}")]
    NotFound(String),
    #[error("Plan {0} is completed and no longer accepts contributions")]
    PlanCompleted(String),
    #[error("Participant `{participant}` is not part of plan {plan_code}")]
    UnknownParticipant {
        plan_code: String,
        participant: String,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Distinguishes the ways an input field can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Missing,
    OutOfRange,
    Duplicate,
    Invalid,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidationKind::Missing => "missing",
            ValidationKind::OutOfRange => "out of range",
            ValidationKind::Duplicate => "duplicate",
            ValidationKind::Invalid => "invalid",
        };
        f.write_str(label)
    }
}

/// Describes which input was rejected and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is {kind}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: ValidationKind::Missing,
            message: message.into(),
        }
    }

    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: ValidationKind::OutOfRange,
            message: message.into(),
        }
    }

    pub fn duplicate(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: ValidationKind::Duplicate,
            message: message.into(),
        }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: ValidationKind::Invalid,
            message: message.into(),
        }
    }
}

/// Failures raised by [`crate::storage::PlanStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Plan code already in use: {0}")]
    DuplicateCode(String),
    #[error("Plan {0} does not exist in the store")]
    Missing(String),
    #[error("Plan {plan_code} changed concurrently (expected version {expected}, found {found})")]
    VersionConflict {
        plan_code: String,
        expected: u64,
        found: u64,
    },
    #[error("Plan schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
