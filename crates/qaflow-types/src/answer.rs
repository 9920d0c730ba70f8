//! Stage artifacts: prefiltered queries, answers and moderation verdicts.

use serde::{Deserialize, Serialize};

use crate::query::QueryContext;

/// A document the prefilter selected as grounding for inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Identifier assigned by the document store.
    pub id: String,

    /// The document as returned by the prefilter.
    pub body: serde_json::Value,
}

/// Output of the prefilter, consumed only by the inference engine.
///
/// Owned by a single pipeline run and handed to inference by value.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefilteredQuery {
    /// Query text as the prefilter wants inference to see it.
    pub text: String,

    /// Request context carried over from the query.
    pub context: QueryContext,

    /// Grounding documents. Empty means nothing relevant was found.
    pub documents: Vec<ContextDocument>,
}

impl PrefilteredQuery {
    /// Returns `true` when the prefilter found no grounding documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// An answer, either cached from a paraphrase match or freshly inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Answer text.
    pub text: String,

    /// Model that produced the answer, when known.
    pub model: Option<String>,
}

impl Answer {
    /// An answer with no model attribution.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Attach the producing model's name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Result of a single moderation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationVerdict {
    /// Whether the text was classified as sensitive.
    pub is_sensitive: bool,

    /// Classifier label or explanation.
    pub reason: Option<String>,

    /// Moderation model name, when known.
    pub model: Option<String>,
}

impl ModerationVerdict {
    /// A non-sensitive verdict.
    pub fn safe() -> Self {
        Self {
            is_sensitive: false,
            reason: None,
            model: None,
        }
    }

    /// A sensitive verdict with a reason.
    pub fn sensitive(reason: impl Into<String>) -> Self {
        Self {
            is_sensitive: true,
            reason: Some(reason.into()),
            model: None,
        }
    }

    /// Attach the moderation model's name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
