//! Error types for HOLONET.
//!
//! One taxonomy is shared by the upstream client, the aggregator and the
//! HTTP layer. The HTTP layer maps each variant onto a status code and a
//! stable machine-readable code.

use thiserror::Error;

/// Result type alias using `HolonetError`.
pub type Result<T> = std::result::Result<T, HolonetError>;

/// Main error type for all HOLONET operations.
#[derive(Debug, Error)]
pub enum HolonetError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CALLER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed (bad id format, missing query).
    #[error("Validation error: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // DEPENDENCY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upstream answered with a non-2xx status or did not answer at all.
    ///
    /// `status` is `None` when no response was received.
    #[error("{message}")]
    Upstream {
        /// HTTP status returned by the upstream, if any
        status: Option<u16>,
        /// Human-readable description, including the status when known
        message: String,
    },

    /// Upstream answered 2xx with a body we could not decode.
    #[error("Decode error: {0}")]
    Decode(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // LOCAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HolonetError {
    /// Upstream answered with `status`.
    pub fn upstream_status(status: u16, reason: impl AsRef<str>) -> Self {
        HolonetError::Upstream {
            status: Some(status),
            message: format!("SWAPI Error: {} - {}", status, reason.as_ref()),
        }
    }

    /// Upstream never answered (connect failure, timeout).
    pub fn no_response() -> Self {
        HolonetError::Upstream {
            status: None,
            message: "SWAPI Error: No response received from server".into(),
        }
    }

    /// Any other failure while talking to the upstream.
    pub fn upstream(reason: impl std::fmt::Display) -> Self {
        HolonetError::Upstream {
            status: None,
            message: format!("SWAPI Error: {}", reason),
        }
    }

    /// Returns the upstream status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            HolonetError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the upstream confirmed the resource is absent (404).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, HolonetError::Validation(_))
    }

    /// Returns true if this error originates from the upstream dependency.
    pub fn is_dependency_error(&self) -> bool {
        matches!(
            self,
            HolonetError::Upstream { .. } | HolonetError::Decode(_)
        ) && !self.is_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_message_keeps_code() {
        let err = HolonetError::upstream_status(404, "Not Found");
        assert_eq!(err.to_string(), "SWAPI Error: 404 - Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_error_classification() {
        assert!(HolonetError::upstream_status(404, "Not Found").is_not_found());
        assert!(!HolonetError::upstream_status(500, "Internal").is_not_found());
        assert!(!HolonetError::no_response().is_not_found());

        assert!(HolonetError::upstream_status(502, "Bad Gateway").is_dependency_error());
        assert!(HolonetError::no_response().is_dependency_error());
        assert!(!HolonetError::upstream_status(404, "Not Found").is_dependency_error());

        assert!(HolonetError::Validation("bad id".into()).is_validation());
        assert!(!HolonetError::Config("bad url".into()).is_validation());
        assert!(!HolonetError::Config("bad url".into()).is_dependency_error());
    }
}
