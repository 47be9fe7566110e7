use panel_core::RequestFailure;
use thiserror::Error;

/// Failure of a job API call. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("{0}")]
    Transport(String),
    /// Non-success status. `message` comes from the body when it has one.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// A success response whose body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedBody(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for RequestFailure {
    fn from(err: ApiError) -> Self {
        RequestFailure {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}
