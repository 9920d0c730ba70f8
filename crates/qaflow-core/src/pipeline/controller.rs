//! Stage sequencer.
//!
//! [`PipelineController`] walks a query through the stages in fixed order:
//!
//! | Stage | Early exit |
//! |---|---|
//! | query moderation | sensitive query -> 400 `sensitive_query` |
//! | paraphrase lookup | match -> 200 with the cached answer |
//! | prefiltering | no documents -> 404 `no_documents_found` |
//! | inference | empty / "unknown" answer -> 404 `invalid_model_answer` |
//! | answer moderation | sensitive answer -> 400 `sensitive_answer` |
//!
//! Any collaborator error, panic or timeout ends the run with 500
//! `collaborator_failure` or 504 `collaborator_timeout`. Nothing is retried.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use qaflow_types::{
    AnswerSource, CollaboratorError, CollaboratorResult, ErrorReason, PipelineConfig,
    PipelineResult, PrefilteredQuery, Query, Stage, StageOutcome,
};

use super::flow::{Halt, Invocation, StageFailure, StageFlow, Termination};
use super::run::PipelineRun;
use super::text;
use super::traits::Collaborators;

/// Orchestrates the four collaborators for one query at a time.
///
/// Holds no per-request state: every call to [`handle`](Self::handle)
/// builds its own run state, so a single controller can serve any
/// number of concurrent requests (share it behind an `Arc`).
pub struct PipelineController {
    collaborators: Collaborators,
    config: PipelineConfig,
}

impl PipelineController {
    /// Create a controller over the given collaborators.
    pub fn new(collaborators: Collaborators, config: PipelineConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    /// Controller settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Answer `query`. Always produces exactly one result.
    pub async fn handle(&self, query: Query) -> PipelineResult {
        // A token nobody else holds is never cancelled.
        let token = CancellationToken::new();
        match self.handle_cancellable(query, &token).await {
            Some(result) => result,
            None => PipelineResult::rejected(ErrorReason::CollaboratorFailure),
        }
    }

    /// Answer `query` unless `cancel` fires first.
    ///
    /// Returns `None` when cancelled: the in-flight collaborator call is
    /// dropped, no later stage starts and no result is produced.
    pub async fn handle_cancellable(
        &self,
        query: Query,
        cancel: &CancellationToken,
    ) -> Option<PipelineResult> {
        let mut run = PipelineRun::new(query);
        let span = info_span!("pipeline_run", run_id = %run.id());

        async move {
            debug!(question = %run.query().text(), "pipeline run started");
            let termination = match self.execute(&mut run, cancel).await {
                Ok(termination) | Err(Halt::Terminate(termination)) => termination,
                Err(Halt::Cancelled) => {
                    info!(stages = run.trace().len(), "pipeline run cancelled");
                    return None;
                }
            };
            let result = run.finish(termination);
            info!(
                status = result.status_code,
                error = ?result.error,
                source = ?result.source,
                "pipeline run finished"
            );
            Some(result)
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        run: &mut PipelineRun,
        cancel: &CancellationToken,
    ) -> StageFlow<Termination> {
        self.moderate_query(run, cancel).await?;

        if let Some(cached) = self.lookup_paraphrase(run, cancel).await? {
            if self.config.moderate_cached_answers {
                self.moderate_answer(run, &cached, cancel).await?;
            }
            return Ok(Termination::Answered {
                text: cached,
                source: AnswerSource::Cached,
            });
        }

        let prefiltered = self.prefilter(run, cancel).await?;
        let answer = self.infer(run, prefiltered, cancel).await?;
        self.moderate_answer(run, &answer, cancel).await?;

        Ok(Termination::Answered {
            text: answer,
            source: AnswerSource::Inferred,
        })
    }

    // ── Stages ──────────────────────────────────────────────────────────

    async fn moderate_query(
        &self,
        run: &mut PipelineRun,
        cancel: &CancellationToken,
    ) -> StageFlow<()> {
        let stage = Stage::QueryModeration;
        let query = run.query();
        let call = self
            .collaborators
            .moderator
            .check(query.text(), query.context());
        let invocation = self.invoke(stage, cancel, call).await?;
        let (verdict, elapsed) = run.settle(stage, invocation)?;

        if verdict.is_sensitive {
            info!(reason = ?verdict.reason, "query classified as sensitive");
            run.record(stage, elapsed, StageOutcome::Terminated, verdict.model);
            return Err(Halt::reject(ErrorReason::SensitiveQuery));
        }
        run.record(stage, elapsed, StageOutcome::Continued, verdict.model);
        Ok(())
    }

    async fn lookup_paraphrase(
        &self,
        run: &mut PipelineRun,
        cancel: &CancellationToken,
    ) -> StageFlow<Option<String>> {
        let stage = Stage::ParaphraseLookup;
        let call = self.collaborators.paraphrase.lookup(run.query());
        let invocation = self.invoke(stage, cancel, call).await?;
        let (found, elapsed) = run.settle(stage, invocation)?;

        let Some(answer) = found else {
            run.record(stage, elapsed, StageOutcome::Continued, None);
            return Ok(None);
        };
        info!("answer reused from paraphrase match");
        let outcome = if self.config.moderate_cached_answers {
            StageOutcome::Continued
        } else {
            StageOutcome::Terminated
        };
        run.record(stage, elapsed, outcome, answer.model);
        Ok(Some(answer.text))
    }

    async fn prefilter(
        &self,
        run: &mut PipelineRun,
        cancel: &CancellationToken,
    ) -> StageFlow<PrefilteredQuery> {
        let stage = Stage::Prefiltering;
        let call = self.collaborators.prefilter.apply(run.query());
        let invocation = self.invoke(stage, cancel, call).await?;
        let (prefiltered, elapsed) = run.settle(stage, invocation)?;

        if prefiltered.is_empty() {
            info!("no relevant documents found while prefiltering");
            run.record(stage, elapsed, StageOutcome::Terminated, None);
            return Err(Halt::reject(ErrorReason::NoDocumentsFound));
        }
        debug!(documents = prefiltered.documents.len(), "query prefiltered");
        run.record(stage, elapsed, StageOutcome::Continued, None);
        Ok(prefiltered)
    }

    async fn infer(
        &self,
        run: &mut PipelineRun,
        input: PrefilteredQuery,
        cancel: &CancellationToken,
    ) -> StageFlow<String> {
        let stage = Stage::Inference;
        let call = self.collaborators.inference.infer(input);
        let invocation = self.invoke(stage, cancel, call).await?;
        let (answer, elapsed) = run.settle(stage, invocation)?;

        let cleaned = text::clean_answer(&answer.text).to_string();
        let language = run.query().context().language;
        if !text::is_valid_answer(&cleaned, language, &self.config.invalid_answers) {
            info!(model = ?answer.model, "inference produced no usable answer");
            run.record(stage, elapsed, StageOutcome::Terminated, answer.model);
            return Err(Halt::reject(ErrorReason::InvalidModelAnswer));
        }
        run.record(stage, elapsed, StageOutcome::Continued, answer.model);
        Ok(cleaned)
    }

    async fn moderate_answer(
        &self,
        run: &mut PipelineRun,
        answer: &str,
        cancel: &CancellationToken,
    ) -> StageFlow<()> {
        let stage = Stage::AnswerModeration;
        let call = self
            .collaborators
            .moderator
            .check(answer, run.query().context());
        let invocation = self.invoke(stage, cancel, call).await?;
        let (verdict, elapsed) = run.settle(stage, invocation)?;

        if verdict.is_sensitive {
            info!(reason = ?verdict.reason, "answer classified as sensitive");
            run.record(stage, elapsed, StageOutcome::Terminated, verdict.model);
            return Err(Halt::reject(ErrorReason::SensitiveAnswer));
        }
        run.record(stage, elapsed, StageOutcome::Continued, verdict.model);
        Ok(())
    }

    // ── Collaborator calls ──────────────────────────────────────────────

    /// Await one collaborator call under the stage's time budget, racing it
    /// against cancellation. Errors, panics and timeouts come back as a
    /// [`StageFailure`]; only cancellation halts here.
    async fn invoke<T, F>(
        &self,
        stage: Stage,
        cancel: &CancellationToken,
        call: F,
    ) -> StageFlow<Invocation<T>>
    where
        F: Future<Output = CollaboratorResult<T>>,
    {
        if cancel.is_cancelled() {
            return Err(Halt::Cancelled);
        }
        debug!(stage = %stage, "stage started");

        let started = Instant::now();
        let limit = self.config.timeout_for(stage);
        let guarded = AssertUnwindSafe(call).catch_unwind();
        let bounded = async move {
            match limit {
                Some(limit) => tokio::time::timeout(limit, guarded).await.ok(),
                None => Some(guarded.await),
            }
        };

        let settled = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(stage = %stage, "cancelled while waiting on collaborator");
                return Err(Halt::Cancelled);
            }
            settled = bounded => settled,
        };

        let elapsed = started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let failure = |outcome, reason| StageFailure {
            outcome,
            reason,
            elapsed,
        };

        Ok(match settled {
            Some(Ok(Ok(value))) => Ok((value, elapsed)),
            Some(Ok(Err(CollaboratorError::Timeout))) => {
                warn!(stage = %stage, elapsed_ms, "collaborator reported a timeout");
                Err(failure(
                    StageOutcome::TimedOut,
                    ErrorReason::CollaboratorTimeout,
                ))
            }
            Some(Ok(Err(err))) => {
                warn!(stage = %stage, elapsed_ms, error = %err, "collaborator failed");
                Err(failure(
                    StageOutcome::Failed,
                    ErrorReason::CollaboratorFailure,
                ))
            }
            Some(Err(_panic)) => {
                warn!(stage = %stage, elapsed_ms, "collaborator panicked");
                Err(failure(
                    StageOutcome::Failed,
                    ErrorReason::CollaboratorFailure,
                ))
            }
            None => {
                warn!(stage = %stage, elapsed_ms, "collaborator exceeded its time budget");
                Err(failure(
                    StageOutcome::TimedOut,
                    ErrorReason::CollaboratorTimeout,
                ))
            }
        })
    }
}
