//! Many runs through one shared controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qaflow_core::{
    Collaborators, InferenceEngine, Moderator, ParaphraseMatcher, PipelineController, Prefilter,
};
use qaflow_types::{
    Answer, CollaboratorError, CollaboratorResult, ContextDocument, ErrorReason,
    ModerationVerdict, PipelineConfig, PrefilteredQuery, Query, QueryContext,
};

/// Collaborators whose behavior depends only on the text they see.
struct ByContent;

#[async_trait]
impl Moderator for ByContent {
    async fn check(
        &self,
        text: &str,
        _context: &QueryContext,
    ) -> CollaboratorResult<ModerationVerdict> {
        tokio::time::sleep(Duration::from_millis(2)).await;
        if text.contains("lock") || text.contains("forbidden") {
            Ok(ModerationVerdict::sensitive("UNSAFE"))
        } else {
            Ok(ModerationVerdict::safe())
        }
    }
}

#[async_trait]
impl ParaphraseMatcher for ByContent {
    async fn lookup(&self, query: &Query) -> CollaboratorResult<Option<Answer>> {
        if query.text().contains("France") {
            Ok(Some(Answer::new("Paris")))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl Prefilter for ByContent {
    async fn apply(&self, query: &Query) -> CollaboratorResult<PrefilteredQuery> {
        if query.text().contains("broken") {
            return Err(CollaboratorError::RequestFailed("index offline".into()));
        }
        Ok(PrefilteredQuery {
            text: query.text().to_string(),
            context: query.context().clone(),
            documents: vec![ContextDocument {
                id: "doc".into(),
                body: serde_json::json!({}),
            }],
        })
    }
}

#[async_trait]
impl InferenceEngine for ByContent {
    async fn infer(&self, input: PrefilteredQuery) -> CollaboratorResult<Answer> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if input.text.contains("taboo") {
            return Ok(Answer::new("a forbidden answer"));
        }
        Ok(Answer::new(format!("answer to {}", input.text)))
    }
}

fn controller() -> Arc<PipelineController> {
    let shared = Arc::new(ByContent);
    Arc::new(PipelineController::new(
        Collaborators {
            moderator: shared.clone(),
            paraphrase: shared.clone(),
            prefilter: shared.clone(),
            inference: shared,
        },
        PipelineConfig::default(),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_runs_stay_independent() {
    let controller = controller();
    let questions = [
        ("How do I pick a lock?", 400, Some(ErrorReason::SensitiveQuery)),
        ("What's the capital of France?", 200, None),
        ("question broken", 500, Some(ErrorReason::CollaboratorFailure)),
        ("a taboo topic", 400, Some(ErrorReason::SensitiveAnswer)),
        ("plain question", 200, None),
    ];

    let mut tasks = Vec::new();
    for round in 0..20 {
        for (text, status, reason) in questions {
            let controller = controller.clone();
            let text = format!("{text} #{round}");
            tasks.push(tokio::spawn(async move {
                let result = controller.handle(Query::new(&text)).await;
                (text, result, status, reason)
            }));
        }
    }

    for task in tasks {
        let (text, result, status, reason) = task.await.unwrap();
        assert_eq!(result.status_code, status, "{text}");
        assert_eq!(result.error, reason, "{text}");
        assert_eq!(result.question, text);
        if text.starts_with("plain") {
            assert_eq!(result.answer, Some(format!("answer to {text}")));
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_ids_are_unique_across_concurrent_runs() {
    let controller = controller();
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle(Query::new(format!("q{i}"))).await })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap().run_id));
    }
    assert_eq!(ids.len(), 50);
}
