//! Scripted, call-recording collaborators for controller tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qaflow_core::{
    Collaborators, InferenceEngine, Moderator, ParaphraseMatcher, PipelineController, Prefilter,
};
use qaflow_types::{
    Answer, CollaboratorError, CollaboratorResult, ContextDocument, ModerationVerdict,
    PipelineConfig, PrefilteredQuery, Query, QueryContext,
};

/// Names of collaborator calls, in the order they started.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// What a scripted collaborator does when called.
#[derive(Clone)]
pub enum Script<T> {
    /// Return this value.
    Value(T),
    /// Return this value after sleeping.
    Delayed(Duration, T),
    /// Fail with `RequestFailed`.
    Fail(&'static str),
    /// Report a client-side timeout.
    TimeoutError,
    /// Panic inside the call.
    Panic,
    /// Never complete.
    Hang,
}

impl<T: Clone> Script<T> {
    async fn play(&self) -> CollaboratorResult<T> {
        match self {
            Script::Value(v) => Ok(v.clone()),
            Script::Delayed(d, v) => {
                tokio::time::sleep(*d).await;
                Ok(v.clone())
            }
            Script::Fail(msg) => Err(CollaboratorError::RequestFailed((*msg).into())),
            Script::TimeoutError => Err(CollaboratorError::Timeout),
            Script::Panic => panic!("scripted collaborator panic"),
            Script::Hang => std::future::pending().await,
        }
    }
}

struct ScriptedModerator {
    query: Script<ModerationVerdict>,
    answer: Script<ModerationVerdict>,
    calls: AtomicUsize,
    log: CallLog,
    moderated: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Moderator for ScriptedModerator {
    async fn check(
        &self,
        text: &str,
        _context: &QueryContext,
    ) -> CollaboratorResult<ModerationVerdict> {
        self.moderated.lock().unwrap().push(text.to_string());
        // One moderator serves both stages; the first call of a run is the query.
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.log.lock().unwrap().push("moderate_query");
            self.query.play().await
        } else {
            self.log.lock().unwrap().push("moderate_answer");
            self.answer.play().await
        }
    }
}

struct ScriptedParaphrase {
    script: Script<Option<Answer>>,
    log: CallLog,
}

#[async_trait]
impl ParaphraseMatcher for ScriptedParaphrase {
    async fn lookup(&self, _query: &Query) -> CollaboratorResult<Option<Answer>> {
        self.log.lock().unwrap().push("paraphrase");
        self.script.play().await
    }
}

struct ScriptedPrefilter {
    script: Script<usize>,
    log: CallLog,
}

#[async_trait]
impl Prefilter for ScriptedPrefilter {
    async fn apply(&self, query: &Query) -> CollaboratorResult<PrefilteredQuery> {
        self.log.lock().unwrap().push("prefilter");
        let count = self.script.play().await?;
        Ok(PrefilteredQuery {
            text: query.text().to_string(),
            context: query.context().clone(),
            documents: (0..count)
                .map(|i| ContextDocument {
                    id: format!("doc-{i}"),
                    body: serde_json::json!({ "doc_id": format!("doc-{i}") }),
                })
                .collect(),
        })
    }
}

struct ScriptedInference {
    script: Script<Answer>,
    log: CallLog,
    inputs: Arc<Mutex<Vec<PrefilteredQuery>>>,
}

#[async_trait]
impl InferenceEngine for ScriptedInference {
    async fn infer(&self, input: PrefilteredQuery) -> CollaboratorResult<Answer> {
        self.log.lock().unwrap().push("infer");
        self.inputs.lock().unwrap().push(input);
        self.script.play().await
    }
}

/// Builder for a controller over scripted collaborators.
///
/// Defaults form the happy path: safe verdicts, no paraphrase match, one
/// document, and the answer "Article discusses X.".
pub struct Harness {
    pub query_verdict: Script<ModerationVerdict>,
    pub answer_verdict: Script<ModerationVerdict>,
    pub paraphrase: Script<Option<Answer>>,
    pub prefilter: Script<usize>,
    pub inference: Script<Answer>,
    pub config: PipelineConfig,
    pub log: CallLog,
    pub moderated: Arc<Mutex<Vec<String>>>,
    pub inputs: Arc<Mutex<Vec<PrefilteredQuery>>>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            query_verdict: Script::Value(ModerationVerdict::safe().with_model("scd-1")),
            answer_verdict: Script::Value(ModerationVerdict::safe().with_model("scd-1")),
            paraphrase: Script::Value(None),
            prefilter: Script::Value(1),
            inference: Script::Value(Answer::new("Article discusses X.").with_model("qa-1")),
            config: PipelineConfig::default(),
            log: CallLog::default(),
            moderated: Arc::default(),
            inputs: Arc::default(),
        }
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller for a single run. The moderator counts calls to tell
    /// query from answer moderation, so build a fresh one per run.
    pub fn controller(&self) -> PipelineController {
        PipelineController::new(self.collaborators(), self.config.clone())
    }

    /// Fresh scripted collaborators sharing this harness's logs.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            moderator: Arc::new(ScriptedModerator {
                query: self.query_verdict.clone(),
                answer: self.answer_verdict.clone(),
                calls: AtomicUsize::new(0),
                log: self.log.clone(),
                moderated: self.moderated.clone(),
            }),
            paraphrase: Arc::new(ScriptedParaphrase {
                script: self.paraphrase.clone(),
                log: self.log.clone(),
            }),
            prefilter: Arc::new(ScriptedPrefilter {
                script: self.prefilter.clone(),
                log: self.log.clone(),
            }),
            inference: Arc::new(ScriptedInference {
                script: self.inference.clone(),
                log: self.log.clone(),
                inputs: self.inputs.clone(),
            }),
        }
    }

    /// Collaborator calls made so far.
    pub fn calls(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    /// Texts passed to the moderator so far.
    pub fn moderated(&self) -> Vec<String> {
        self.moderated.lock().unwrap().clone()
    }

    /// Inputs passed to the inference engine so far.
    pub fn inference_inputs(&self) -> Vec<PrefilteredQuery> {
        self.inputs.lock().unwrap().clone()
    }
}

pub fn sensitive(label: &str) -> Script<ModerationVerdict> {
    Script::Value(ModerationVerdict::sensitive(label).with_model("scd-1"))
}

pub fn cached(text: &str) -> Script<Option<Answer>> {
    Script::Value(Some(Answer::new(text)))
}

pub fn answer(text: &str) -> Script<Answer> {
    Script::Value(Answer::new(text).with_model("qa-1"))
}
