//! Control-flow types shared by the controller and the run context.
//!
//! A stage either continues with a value (`Ok`) or halts the run (`Err`).
//! Halting carries the terminal decision, so `?` stops the sequence at the
//! first stage that decides the outcome.

use std::time::Duration;

use qaflow_types::{AnswerSource, ErrorReason, StageOutcome};

/// Terminal decision of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Termination {
    /// Return this answer with status 200.
    Answered { text: String, source: AnswerSource },
    /// Return the status for this reason, without an answer.
    Rejected(ErrorReason),
}

/// Why the stage sequence stopped early.
#[derive(Debug)]
pub(crate) enum Halt {
    /// A stage decided the result.
    Terminate(Termination),
    /// The caller went away; no result is owed.
    Cancelled,
}

impl Halt {
    pub(crate) fn reject(reason: ErrorReason) -> Self {
        Halt::Terminate(Termination::Rejected(reason))
    }
}

/// Outcome of one stage: continue with `T`, or halt.
pub(crate) type StageFlow<T> = Result<T, Halt>;

/// A collaborator call that did not produce a value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageFailure {
    pub(crate) outcome: StageOutcome,
    pub(crate) reason: ErrorReason,
    pub(crate) elapsed: Duration,
}

/// What a single collaborator call produced, with the time it took.
pub(crate) type Invocation<T> = Result<(T, Duration), StageFailure>;
