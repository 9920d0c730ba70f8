//! Error types for the HTTP adapters.
//!
//! [`ServiceError`] keeps the transport detail (reqwest) inside this crate.
//! At the collaborator trait boundary it converts into [`CollaboratorError`]
//! via `From`, so adapters can use `?` throughout.

use qaflow_types::CollaboratorError;
use thiserror::Error;

/// Errors that can occur when calling a collaborator service over HTTP.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service rejected our credentials (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The service needs a key that is not available.
    #[error("service not configured: {0}")]
    NotConfigured(String),

    /// The service returned a body we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A convenience type alias for adapter operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<ServiceError> for CollaboratorError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RequestFailed(msg) => CollaboratorError::RequestFailed(msg),
            ServiceError::AuthFailed(msg) => CollaboratorError::AuthFailed(msg),
            ServiceError::NotConfigured(msg) => CollaboratorError::NotConfigured(msg),
            ServiceError::InvalidResponse(msg) => CollaboratorError::InvalidResponse(msg),
            ServiceError::Http(e) if e.is_timeout() => CollaboratorError::Timeout,
            ServiceError::Http(e) => CollaboratorError::RequestFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_request_failed() {
        let err = ServiceError::RequestFailed("HTTP 502 Bad Gateway: upstream".into());
        assert_eq!(
            err.to_string(),
            "request failed: HTTP 502 Bad Gateway: upstream"
        );
    }

    #[test]
    fn display_not_configured() {
        let err = ServiceError::NotConfigured("set SCD_API_KEY env var".into());
        assert_eq!(
            err.to_string(),
            "service not configured: set SCD_API_KEY env var"
        );
    }

    #[test]
    fn converts_into_collaborator_error() {
        let err: CollaboratorError = ServiceError::AuthFailed("bad token".into()).into();
        assert!(matches!(err, CollaboratorError::AuthFailed(ref m) if m == "bad token"));

        let err: CollaboratorError = ServiceError::InvalidResponse("not json".into()).into();
        assert!(matches!(err, CollaboratorError::InvalidResponse(ref m) if m == "not json"));
    }
}
