//! Pipeline stages, the per-run trace, and the terminal result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five pipeline stages, in execution order.
///
/// `Ord` compares by position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// First: moderation of the incoming query.
    QueryModeration,
    /// Second: lookup of a previously answered paraphrase.
    ParaphraseLookup,
    /// Third: prefiltering / retrieval of grounding documents.
    Prefiltering,
    /// Fourth: answer generation.
    Inference,
    /// Last: moderation of the produced answer.
    AnswerModeration,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::QueryModeration,
        Stage::ParaphraseLookup,
        Stage::Prefiltering,
        Stage::Inference,
        Stage::AnswerModeration,
    ];

    /// Stable snake_case name, used in logs and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::QueryModeration => "query_moderation",
            Stage::ParaphraseLookup => "paraphrase_lookup",
            Stage::Prefiltering => "prefiltering",
            Stage::Inference => "inference",
            Stage::AnswerModeration => "answer_moderation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single stage call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The run moved on to the next stage.
    Continued,
    /// The stage produced the terminal result (rejection or answer).
    Terminated,
    /// The collaborator returned an error.
    Failed,
    /// The collaborator exceeded its time budget.
    TimedOut,
}

/// One entry of a run trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage that was invoked.
    pub stage: Stage,

    /// Wall-clock time spent waiting on the collaborator.
    pub elapsed_ms: u64,

    /// How the stage ended.
    pub outcome: StageOutcome,

    /// Model reported by the collaborator, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Reason code attached to every non-success result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// The query was flagged by moderation.
    SensitiveQuery,
    /// The produced answer was flagged by moderation.
    SensitiveAnswer,
    /// The prefilter found nothing to ground an answer on.
    NoDocumentsFound,
    /// Inference produced an empty or "unknown" answer.
    InvalidModelAnswer,
    /// A collaborator returned an error.
    CollaboratorFailure,
    /// A collaborator did not answer within its time budget.
    CollaboratorTimeout,
}

impl ErrorReason {
    /// Status code reported for this reason.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorReason::SensitiveQuery | ErrorReason::SensitiveAnswer => 400,
            ErrorReason::NoDocumentsFound | ErrorReason::InvalidModelAnswer => 404,
            ErrorReason::CollaboratorFailure => 500,
            ErrorReason::CollaboratorTimeout => 504,
        }
    }

    /// Stable snake_case code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::SensitiveQuery => "sensitive_query",
            ErrorReason::SensitiveAnswer => "sensitive_answer",
            ErrorReason::NoDocumentsFound => "no_documents_found",
            ErrorReason::InvalidModelAnswer => "invalid_model_answer",
            ErrorReason::CollaboratorFailure => "collaborator_failure",
            ErrorReason::CollaboratorTimeout => "collaborator_timeout",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a successful answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Reused from a paraphrase match.
    Cached,
    /// Produced by the inference engine during this run.
    Inferred,
}

/// The single terminal artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Identifier of the run that produced this result.
    pub run_id: Uuid,

    /// HTTP-style status code.
    pub status_code: u16,

    /// Answer text, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Reason code, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReason>,

    /// Origin of the answer, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AnswerSource>,

    /// The cleaned question text.
    pub question: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Stages invoked during the run, in order.
    #[serde(default)]
    pub trace: Vec<StageRecord>,
}

impl PipelineResult {
    /// A 200 result carrying an answer.
    pub fn answered(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            run_id: Uuid::nil(),
            status_code: 200,
            answer: Some(answer.into()),
            error: None,
            source: Some(source),
            question: String::new(),
            started_at: Utc::now(),
            trace: Vec::new(),
        }
    }

    /// A non-success result for the given reason. Never carries an answer.
    pub fn rejected(reason: ErrorReason) -> Self {
        Self {
            run_id: Uuid::nil(),
            status_code: reason.status_code(),
            answer: None,
            error: Some(reason),
            source: None,
            question: String::new(),
            started_at: Utc::now(),
            trace: Vec::new(),
        }
    }

    /// Returns `true` for a 200 result.
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.error.is_none()
    }

    /// Stages invoked, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.trace.iter().map(|r| r.stage).collect()
    }
}
