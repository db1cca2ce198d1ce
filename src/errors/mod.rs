use std::fmt;

use thiserror::Error;

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// A single player whose statistics could not be brought up to date.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerUpdateFailure {
    pub player_id: i64,
    pub reason: String,
}

impl fmt::Display for PlayerUpdateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}: {}", self.player_id, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("failed to update {} player(s): {}", .0.len(), join_failures(.0))]
    PlayerUpdatesFailed(Vec<PlayerUpdateFailure>),

    #[error(transparent)]
    Storage(anyhow::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable machine-readable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PlayerUpdatesFailed(_) => "PLAYER_UPDATES_FAILED",
            Self::Storage(_) => "INTERNAL",
        }
    }
}

/// A write that lost a race against a UNIQUE constraint is a conflict, not a
/// storage failure.
impl From<anyhow::Error> for LedgerError {
    fn from(err: anyhow::Error) -> Self {
        let violation = match err.downcast_ref::<rusqlite::Error>() {
            Some(rusqlite::Error::SqliteFailure(failure, message)) if is_unique_violation(failure) => {
                Some(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            _ => None,
        };

        match violation {
            Some(message) => Self::Conflict(message),
            None => Self::Storage(err),
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::from(anyhow::Error::from(err))
    }
}

fn is_unique_violation(failure: &rusqlite::ffi::Error) -> bool {
    failure.code == rusqlite::ErrorCode::ConstraintViolation
        && matches!(
            failure.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
}

fn join_failures(failures: &[PlayerUpdateFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
