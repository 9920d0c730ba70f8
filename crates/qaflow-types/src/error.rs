//! Error types for qaflow.
//!
//! [`QaError`] covers configuration and I/O problems outside a pipeline run.
//! [`CollaboratorError`] is what the four external collaborators (moderator,
//! paraphrase matcher, prefilter, inference engine) report back to the
//! controller. The controller never surfaces either to its caller; it maps
//! them onto a [`PipelineResult`](crate::result::PipelineResult).

use thiserror::Error;

/// Top-level error type for qaflow.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QaError {
    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors a collaborator can return from a single stage call.
///
/// None of these are sensitivity verdicts or "no match" answers; they are
/// failures, and the controller treats them as such.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CollaboratorError {
    /// The call to the collaborator failed (network, 5xx, internal error).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The collaborator rejected our credentials (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The collaborator answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The collaborator has not been configured (e.g. missing API key).
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The collaborator did not answer in time.
    #[error("timeout")]
    Timeout,
}

/// A convenience type alias for qaflow results.
pub type Result<T> = std::result::Result<T, QaError>;

/// Result type returned by collaborator trait methods.
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;
