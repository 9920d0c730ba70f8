//! # qaflow-types
//!
//! Core type definitions for the qaflow question-answering pipeline.
//!
//! This crate is the foundation of the dependency graph -- every other
//! qaflow crate depends on it. It contains:
//!
//! - **[`error`]** -- [`QaError`] and [`CollaboratorError`] error types
//! - **[`config`]** -- Configuration schema for the pipeline and its services
//! - **[`query`]** -- Queries, request context and the inference request envelope
//! - **[`answer`]** -- Prefiltered queries, answers and moderation verdicts
//! - **[`result`]** -- Stages, the run trace and the terminal [`PipelineResult`]

pub mod answer;
pub mod config;
pub mod error;
pub mod query;
pub mod result;

pub use answer::{Answer, ContextDocument, ModerationVerdict, PrefilteredQuery};
pub use config::{
    EndpointConfig, InvalidAnswers, PipelineConfig, QaflowConfig, ServicesConfig, StageTimeouts,
};
pub use error::{CollaboratorError, CollaboratorResult, QaError, Result};
pub use query::{InferRequest, Language, Query, QueryContext};
pub use result::{AnswerSource, ErrorReason, PipelineResult, Stage, StageOutcome, StageRecord};
