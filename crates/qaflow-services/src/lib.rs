//! HTTP collaborator adapters for qaflow.
//!
//! Implements the four [`qaflow_core`] collaborator traits against JSON
//! HTTP services:
//!
//! - [`HttpModerator`] -- sensitive-content detection (query and answer)
//! - [`HttpParaphraseMatcher`] -- gold-standard answer lookup
//! - [`HttpPrefilter`] -- grounding document selection
//! - [`HttpInferenceEngine`] -- answer generation
//!
//! All four share [`JsonClient`]; transport errors surface as
//! [`ServiceError`] and convert into
//! [`CollaboratorError`](qaflow_types::CollaboratorError) at the trait
//! boundary.

pub mod client;
pub mod error;
pub mod inference;
pub mod moderation;
pub mod paraphrase;
pub mod prefilter;

use std::sync::Arc;

use qaflow_core::Collaborators;
use qaflow_types::ServicesConfig;
use tracing::debug;

pub use client::JsonClient;
pub use error::{Result, ServiceError};
pub use inference::HttpInferenceEngine;
pub use moderation::HttpModerator;
pub use paraphrase::HttpParaphraseMatcher;
pub use prefilter::HttpPrefilter;

/// Build HTTP-backed collaborators for every configured service.
pub fn build_collaborators(config: &ServicesConfig) -> Result<Collaborators> {
    for (name, endpoint) in config.endpoints() {
        debug!(service = name, url = %endpoint.url(), "configuring collaborator");
    }
    Ok(Collaborators {
        moderator: Arc::new(HttpModerator::new(config.moderation.clone())?),
        paraphrase: Arc::new(HttpParaphraseMatcher::new(config.paraphrase.clone())?),
        prefilter: Arc::new(HttpPrefilter::new(config.prefilter.clone())?),
        inference: Arc::new(HttpInferenceEngine::new(config.inference.clone())?),
    })
}
