//! `qaflow ask` -- run one question through the pipeline.
//!
//! Builds HTTP collaborators from the resolved config, runs the controller
//! and prints the [`PipelineResult`](qaflow_types::PipelineResult) as JSON.
//! Ctrl-C cancels the run; nothing is printed in that case.
//!
//! The question comes either from the command line or, with `--request`,
//! from a JSON request envelope in a file or on stdin (`-`).

use anyhow::Context;
use clap::Args;
use qaflow_core::PipelineController;
use qaflow_services::build_collaborators;
use qaflow_types::{InferRequest, Language, Query, QueryContext};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Exit code for a run cancelled by SIGINT.
pub const EXIT_CANCELLED: i32 = 130;

/// Arguments for the `ask` subcommand.
#[derive(Args)]
pub struct AskArgs {
    /// The question to answer.
    #[arg(required_unless_present = "request")]
    pub query: Option<String>,

    /// Read a JSON request (`query`, `course_id`, `user_id`, `language`)
    /// from FILE, or from stdin when FILE is `-`.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["query", "course_id", "user_id", "language"]
    )]
    pub request: Option<String>,

    /// Course whose material scopes the answer.
    #[arg(long, default_value = "")]
    pub course_id: String,

    /// User on whose behalf the question is asked.
    #[arg(long, default_value = "")]
    pub user_id: String,

    /// Question language (en, de).
    #[arg(long, default_value = "en", value_parser = parse_language)]
    pub language: Language,

    /// Config file path (overrides QAFLOW_CONFIG).
    #[arg(short, long)]
    pub config: Option<String>,
}

fn parse_language(raw: &str) -> Result<Language, String> {
    Language::parse(raw).ok_or_else(|| format!("unsupported language '{raw}' (expected en or de)"))
}

/// Read and parse a request envelope from a file, or stdin for `-`.
async fn read_request(source: &str) -> anyhow::Result<InferRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read request from {source}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("invalid request in {source}"))
}

/// Run the question and return the process exit code:
/// 0 for an answer, 1 for any other status, 130 when cancelled.
pub async fn run(args: AskArgs) -> anyhow::Result<i32> {
    let config = super::load_config(args.config.as_deref())?;
    let collaborators =
        build_collaborators(&config.services).context("failed to build service clients")?;
    let controller = PipelineController::new(collaborators, config.pipeline);

    let query = match args.request.as_deref() {
        Some(source) => read_request(source).await?.into_query(),
        None => Query::with_context(
            args.query.unwrap_or_default(),
            QueryContext {
                course_id: args.course_id,
                user_id: args.user_id,
                language: args.language,
            },
        ),
    };

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, cancelling");
                cancel.cancel();
            }
        })
    };

    let outcome = controller.handle_cancellable(query, &cancel).await;
    interrupt.abort();

    let Some(result) = outcome else {
        return Ok(EXIT_CANCELLED);
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(if result.is_success() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn language_parser_accepts_known_codes() {
        assert_eq!(parse_language("de"), Ok(Language::De));
        assert_eq!(parse_language("EN"), Ok(Language::En));
        assert!(parse_language("fr").unwrap_err().contains("fr"));
    }

    #[tokio::test]
    async fn request_file_becomes_query() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"query": " Wer hat das geschrieben? ", "courseId": "c-1", "language": "de"}}"#
        )
        .unwrap();

        let query = read_request(file.path().to_str().unwrap())
            .await
            .unwrap()
            .into_query();

        assert_eq!(query.text(), "Wer hat das geschrieben?");
        assert_eq!(query.context().course_id, "c-1");
        assert_eq!(query.context().user_id, "");
        assert_eq!(query.context().language, Language::De);
    }

    #[tokio::test]
    async fn request_without_query_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"course_id": "c-1"}}"#).unwrap();

        let err = read_request(file.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid request"), "{err}");
    }

    #[tokio::test]
    async fn missing_request_file_names_the_path() {
        let err = read_request("/tmp/.qaflow-no-such-request.json")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("qaflow-no-such-request"), "{err}");
    }
}
