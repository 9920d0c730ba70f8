//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Every field has a default and unknown fields are
//! ignored, so an empty JSON object is a valid configuration.
//!
//! # Module Structure
//!
//! - [`services`] -- Endpoints of the four external collaborators

pub mod services;

pub use services::*;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};
use crate::query::Language;
use crate::result::Stage;

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for qaflow.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QaflowConfig {
    /// Controller behavior.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Collaborator endpoints.
    #[serde(default)]
    pub services: ServicesConfig,
}

impl QaflowConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.services.validate()
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// Controller settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Per-stage time budgets.
    #[serde(default)]
    pub timeouts: StageTimeouts,

    /// Run answer moderation on paraphrase hits too.
    #[serde(default, alias = "moderateCachedAnswers")]
    pub moderate_cached_answers: bool,

    /// Answers treated as "the model does not know".
    #[serde(default, alias = "invalidAnswers")]
    pub invalid_answers: InvalidAnswers,
}

impl PipelineConfig {
    /// Time budget for a stage; `None` means unbounded.
    pub fn timeout_for(&self, stage: Stage) -> Option<Duration> {
        let ms = match stage {
            Stage::QueryModeration | Stage::AnswerModeration => self.timeouts.moderation_ms,
            Stage::ParaphraseLookup => self.timeouts.paraphrase_ms,
            Stage::Prefiltering => self.timeouts.prefilter_ms,
            Stage::Inference => self.timeouts.inference_ms,
        };
        ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<()> {
        for stage in Stage::ALL {
            if self.timeout_for(stage) == Some(Duration::ZERO) {
                return Err(QaError::ConfigInvalid {
                    reason: format!("pipeline timeout for {stage} must be > 0 (use null to disable)"),
                });
            }
        }
        Ok(())
    }
}

/// Per-stage time budgets in milliseconds. `null` disables the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimeouts {
    /// Applies to both query and answer moderation.
    #[serde(default = "default_moderation_ms", alias = "moderationMs")]
    pub moderation_ms: Option<u64>,

    /// Paraphrase lookup.
    #[serde(default = "default_paraphrase_ms", alias = "paraphraseMs")]
    pub paraphrase_ms: Option<u64>,

    /// Prefiltering.
    #[serde(default = "default_prefilter_ms", alias = "prefilterMs")]
    pub prefilter_ms: Option<u64>,

    /// Inference.
    #[serde(default = "default_inference_ms", alias = "inferenceMs")]
    pub inference_ms: Option<u64>,
}

fn default_moderation_ms() -> Option<u64> {
    Some(10_000)
}
fn default_paraphrase_ms() -> Option<u64> {
    Some(5_000)
}
fn default_prefilter_ms() -> Option<u64> {
    Some(10_000)
}
fn default_inference_ms() -> Option<u64> {
    Some(60_000)
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            moderation_ms: default_moderation_ms(),
            paraphrase_ms: default_paraphrase_ms(),
            prefilter_ms: default_prefilter_ms(),
            inference_ms: default_inference_ms(),
        }
    }
}

impl StageTimeouts {
    /// No budget on any stage.
    pub fn unbounded() -> Self {
        Self {
            moderation_ms: None,
            paraphrase_ms: None,
            prefilter_ms: None,
            inference_ms: None,
        }
    }
}

/// Per-language markers of an answer the model could not produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidAnswers {
    /// English markers.
    #[serde(default = "default_invalid_en")]
    pub en: Vec<String>,

    /// German markers.
    #[serde(default = "default_invalid_de")]
    pub de: Vec<String>,
}

fn default_invalid_en() -> Vec<String> {
    vec!["unknown".into(), "unknown.".into()]
}
fn default_invalid_de() -> Vec<String> {
    vec!["unbekannt".into(), "unbekannt.".into()]
}

impl Default for InvalidAnswers {
    fn default() -> Self {
        Self {
            en: default_invalid_en(),
            de: default_invalid_de(),
        }
    }
}

impl InvalidAnswers {
    /// Markers for the given language.
    pub fn markers(&self, language: Language) -> &[String] {
        match language {
            Language::En => &self.en,
            Language::De => &self.de,
        }
    }
}
