//! Collaborator capability traits.
//!
//! Each external service the controller talks to is a trait, so the
//! sequencing logic can be exercised without any real moderation or
//! inference behind it.
//!
//! The collaborators in stage order:
//! 1. **[`Moderator`]** -- classify a text span as sensitive (query, then answer)
//! 2. **[`ParaphraseMatcher`]** -- find a previously answered equivalent query
//! 3. **[`Prefilter`]** -- select grounding documents for inference
//! 4. **[`InferenceEngine`]** -- answer a prefiltered query
//!
//! Every method returns [`CollaboratorResult`]. An `Err` is a failure of
//! the collaborator itself and is never read as "not sensitive" or "no match".

use std::sync::Arc;

use async_trait::async_trait;

use qaflow_types::{
    Answer, CollaboratorResult, ModerationVerdict, PrefilteredQuery, Query, QueryContext,
};

/// Stages 1 and 5: content moderation.
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Classify `text`, asked or answered on behalf of `context`.
    async fn check(
        &self,
        text: &str,
        context: &QueryContext,
    ) -> CollaboratorResult<ModerationVerdict>;
}

/// Stage 2: paraphrase cache.
#[async_trait]
pub trait ParaphraseMatcher: Send + Sync {
    /// Return the stored answer of a paraphrased earlier query, or `None`.
    ///
    /// A returned answer is trusted as already moderated.
    async fn lookup(&self, query: &Query) -> CollaboratorResult<Option<Answer>>;
}

/// Stage 3: prefiltering.
#[async_trait]
pub trait Prefilter: Send + Sync {
    /// Transform, validate and enrich the query for inference.
    async fn apply(&self, query: &Query) -> CollaboratorResult<PrefilteredQuery>;
}

/// Stage 4: answer generation.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Produce an answer. The prefiltered query is consumed.
    async fn infer(&self, input: PrefilteredQuery) -> CollaboratorResult<Answer>;
}

/// The four collaborators a controller orchestrates.
#[derive(Clone)]
pub struct Collaborators {
    /// Used for both query and answer moderation.
    pub moderator: Arc<dyn Moderator>,
    /// Paraphrase cache.
    pub paraphrase: Arc<dyn ParaphraseMatcher>,
    /// Prefilter.
    pub prefilter: Arc<dyn Prefilter>,
    /// Inference engine.
    pub inference: Arc<dyn InferenceEngine>,
}
