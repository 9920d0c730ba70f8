//! Per-request execution context.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use qaflow_types::{PipelineResult, Query, Stage, StageOutcome, StageRecord};

use super::flow::{Halt, Invocation, StageFlow, Termination};

/// Binds one [`Query`] to the outcomes of the stages it went through.
///
/// Created when the controller accepts a query and consumed by
/// [`finish`](Self::finish), so nothing a stage produced outlives the run.
#[derive(Debug)]
pub(crate) struct PipelineRun {
    id: Uuid,
    query: Query,
    started_at: DateTime<Utc>,
    trace: Vec<StageRecord>,
}

impl PipelineRun {
    /// Start a run for `query`.
    pub(crate) fn new(query: Query) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            started_at: Utc::now(),
            trace: Vec::with_capacity(Stage::ALL.len()),
        }
    }

    /// Unique run identifier.
    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    /// The query being answered.
    pub(crate) fn query(&self) -> &Query {
        &self.query
    }

    /// Stages recorded so far.
    pub(crate) fn trace(&self) -> &[StageRecord] {
        &self.trace
    }

    /// Record the outcome of a stage. Stages must be recorded in order and
    /// at most once.
    pub(crate) fn record(
        &mut self,
        stage: Stage,
        elapsed: Duration,
        outcome: StageOutcome,
        model: Option<String>,
    ) {
        debug_assert!(
            self.trace.last().is_none_or(|last| last.stage < stage),
            "stage {stage} recorded out of order"
        );
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        debug!(stage = %stage, elapsed_ms, outcome = ?outcome, "stage finished");
        self.trace.push(StageRecord {
            stage,
            elapsed_ms,
            outcome,
            model,
        });
    }

    /// Record a failed invocation and halt, or pass the value through.
    pub(crate) fn settle<T>(
        &mut self,
        stage: Stage,
        invocation: Invocation<T>,
    ) -> StageFlow<(T, Duration)> {
        match invocation {
            Ok(completed) => Ok(completed),
            Err(failure) => {
                self.record(stage, failure.elapsed, failure.outcome, None);
                Err(Halt::reject(failure.reason))
            }
        }
    }

    /// Turn the terminal decision into the run's single result.
    pub(crate) fn finish(self, termination: Termination) -> PipelineResult {
        let mut result = match termination {
            Termination::Answered { text, source } => PipelineResult::answered(text, source),
            Termination::Rejected(reason) => PipelineResult::rejected(reason),
        };
        result.run_id = self.id;
        result.question = self.query.text().to_string();
        result.started_at = self.started_at;
        result.trace = self.trace;
        result
    }
}
