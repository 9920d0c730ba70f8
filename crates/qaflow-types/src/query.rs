//! Incoming queries and their request context.

use serde::{Deserialize, Serialize};

/// Language a query is asked (and answered) in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

impl Language {
    /// Returns the wire name (`"en"` / `"de"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    /// Parse a language code, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "de" => Some(Language::De),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request metadata that travels alongside the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Course whose material scopes the paraphrase cache and prefilter.
    #[serde(default, alias = "courseId")]
    pub course_id: String,

    /// Asking user, forwarded to moderation and inference.
    #[serde(default, alias = "userId")]
    pub user_id: String,

    /// Language of the query.
    #[serde(default)]
    pub language: Language,
}

/// A user-submitted query.
///
/// The text is cleaned once on construction and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    context: QueryContext,
}

impl Query {
    /// Create a query with a default context.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self::with_context(text, QueryContext::default())
    }

    /// Create a query with the given context.
    pub fn with_context(text: impl AsRef<str>, context: QueryContext) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            context,
        }
    }

    /// The cleaned query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The request context.
    pub fn context(&self) -> &QueryContext {
        &self.context
    }
}

/// Request envelope accepted by the surrounding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferRequest {
    /// Raw query text.
    pub query: String,

    /// Course identifier.
    #[serde(default, alias = "courseId")]
    pub course_id: String,

    /// User identifier.
    #[serde(default, alias = "userId")]
    pub user_id: String,

    /// Query language.
    #[serde(default)]
    pub language: Language,
}

impl InferRequest {
    /// Convert the envelope into a pipeline [`Query`].
    pub fn into_query(self) -> Query {
        Query::with_context(
            self.query,
            QueryContext {
                course_id: self.course_id,
                user_id: self.user_id,
                language: self.language,
            },
        )
    }
}
