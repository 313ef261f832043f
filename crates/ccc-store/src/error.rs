//! Error types for CCC Store
//!
//! - Backend failures (transport, HTTP status, bad documents)
//! - Submission failures (validation or storage)

use ccc_core::ValidationError;

/// Store backend error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// A stored document does not have the expected shape
    #[error("malformed document {name}: {reason}")]
    MalformedDocument {
        /// Document path or id
        name: String,
        /// What was wrong
        reason: String,
    },

    /// Response body is not valid JSON
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend cannot be reached or is switched off
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend settings are incomplete
    #[error("store misconfigured: {0}")]
    Misconfigured(String),
}

impl StorageError {
    /// Longest body kept in [`StorageError::Status`]
    pub const MAX_BODY: usize = 512;

    /// Build a status error, truncating long bodies
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(Self::MAX_BODY) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::Status { status, body }
    }

    /// Whether trying again later might succeed
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Unavailable(_) => true,
            Self::MalformedDocument { .. } | Self::Json(_) | Self::Misconfigured(_) => false,
        }
    }
}

/// Why a marker submission failed
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The form is incomplete; nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected or failed the write
    #[error("marker was not stored: {0}")]
    Storage(#[from] StorageError),
}

impl SubmissionError {
    /// Whether the user can retry without changing the form
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Storage(e) => e.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccc_core::RequiredField;

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        match StorageError::status(500, &body) {
            StorageError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), StorageError::MAX_BODY + 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn recoverability() {
        assert!(StorageError::status(503, "").is_recoverable());
        assert!(StorageError::status(429, "").is_recoverable());
        assert!(!StorageError::status(403, "denied").is_recoverable());
        assert!(StorageError::Unavailable("down".into()).is_recoverable());

        let invalid = SubmissionError::from(ValidationError {
            missing: vec![RequiredField::Location],
        });
        assert!(!invalid.is_recoverable());
        assert!(invalid.to_string().contains("location"));
    }
}
