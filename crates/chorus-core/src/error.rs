//! Shared error type across chorus crates.

use thiserror::Error;

/// Stable error codes, used in logs and by config tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed message or config.
    BadRequest,
    /// State conflict (already registered, name taken).
    Conflict,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChorusError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ChorusError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("connection already has a registered user")]
    AlreadyRegistered,
    #[error("display name already taken: {0}")]
    NameTaken(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ChorusError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ChorusError::BadRequest(_) => ErrorCode::BadRequest,
            ChorusError::AlreadyRegistered | ChorusError::NameTaken(_) => ErrorCode::Conflict,
            ChorusError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            ChorusError::Internal(_) => ErrorCode::Internal,
        }
    }
}
