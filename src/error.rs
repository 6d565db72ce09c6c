use reqwest::StatusCode;
use thiserror::Error;

use crate::core::task::TaskId;

/// Errors produced by the controller and the sync gateways.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Transport failure talking to the task API
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The task API answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The backend refused a change because of the task's status
    #[error("{0}")]
    BusinessRule(String),

    #[error("Task {0} not found")]
    NotFound(TaskId),

    /// The task at an index is no longer the one an action was requested for
    #[error("Task at position {index} changed (expected {expected})")]
    StaleIndex { index: usize, expected: TaskId },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn backend(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Backend {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when the backend understood the request and refused it, as opposed
    /// to a transport or server failure.
    pub fn is_rejection(&self) -> bool {
        match self {
            Error::BusinessRule(_) => true,
            Error::Backend { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_rejections() {
        assert!(Error::backend(StatusCode::BAD_REQUEST, "locked").is_rejection());
        assert!(Error::backend(StatusCode::FORBIDDEN, "").is_rejection());
        assert!(Error::BusinessRule("locked".into()).is_rejection());
    }

    #[test]
    fn server_errors_are_not_rejections() {
        assert!(!Error::backend(StatusCode::INTERNAL_SERVER_ERROR, "boom").is_rejection());
        assert!(!Error::Validation("empty".into()).is_rejection());
        assert!(!Error::Config("bad".into()).is_rejection());
    }

    #[test]
    fn backend_error_keeps_status_code() {
        match Error::backend(StatusCode::UNPROCESSABLE_ENTITY, "nope") {
            Error::Backend { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "nope");
            }
            other => panic!("expected Backend, got {other:?}"),
        }
    }
}
