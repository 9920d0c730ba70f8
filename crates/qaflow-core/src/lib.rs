//! Request pipeline controller for qaflow.
//!
//! A query moves through five ordered stages, each backed by an external
//! collaborator, and any stage may end the run early:
//!
//! 1. **query moderation** -- [`Moderator`] on the raw query
//! 2. **paraphrase lookup** -- [`ParaphraseMatcher`] for a reusable answer
//! 3. **prefiltering** -- [`Prefilter`] selects grounding documents
//! 4. **inference** -- [`InferenceEngine`] produces the answer
//! 5. **answer moderation** -- [`Moderator`] on the produced answer
//!
//! [`PipelineController`] sequences the stages and turns every outcome,
//! including collaborator failures, into exactly one
//! [`PipelineResult`](qaflow_types::PipelineResult).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use qaflow_core::{Collaborators, PipelineController};
//! use qaflow_types::{PipelineConfig, Query};
//!
//! let controller = PipelineController::new(collaborators, PipelineConfig::default());
//! let result = controller.handle(Query::new("What's the capital of France?")).await;
//! println!("{} {:?}", result.status_code, result.answer);
//! ```
//!
//! Per-run state stays inside the controller; callers only ever see the
//! finished result.
//!
//! ```rust,compile_fail
//! use qaflow_core::pipeline::run::PipelineRun;
//! ```

pub mod pipeline;

pub use pipeline::controller::PipelineController;
pub use pipeline::traits::{Collaborators, InferenceEngine, Moderator, ParaphraseMatcher, Prefilter};
