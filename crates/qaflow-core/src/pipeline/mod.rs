//! 5-stage question-answering pipeline.
//!
//! Stages: QueryModeration -> ParaphraseLookup -> Prefiltering -> Inference -> AnswerModeration

pub mod controller;
pub mod text;
pub mod traits;

mod flow;
mod run;
