//! Paraphrase (gold-standard answer) adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qaflow_core::ParaphraseMatcher;
use qaflow_types::{Answer, CollaboratorResult, EndpointConfig, Query};

use crate::client::JsonClient;
use crate::error::Result;

#[derive(Serialize)]
struct ParaphraseRequest<'a> {
    question_content_str: &'a str,
    course_id: &'a str,
}

#[derive(Deserialize)]
struct ParaphraseResponse {
    #[serde(default)]
    gs_answer_content_str: Option<String>,
}

/// [`ParaphraseMatcher`] backed by an HTTP paraphrase service.
///
/// The service answers `null` (or nothing) when no earlier question matches.
#[derive(Debug)]
pub struct HttpParaphraseMatcher {
    client: JsonClient,
}

impl HttpParaphraseMatcher {
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self {
            client: JsonClient::new("paraphrase", endpoint)?,
        })
    }
}

#[async_trait]
impl ParaphraseMatcher for HttpParaphraseMatcher {
    async fn lookup(&self, query: &Query) -> CollaboratorResult<Option<Answer>> {
        let request = ParaphraseRequest {
            question_content_str: query.text(),
            course_id: &query.context().course_id,
        };
        let response: Option<ParaphraseResponse> = self.client.post_json(&request).await?;
        Ok(response.and_then(stored_answer))
    }
}

fn stored_answer(response: ParaphraseResponse) -> Option<Answer> {
    response
        .gs_answer_content_str
        .filter(|text| !text.trim().is_empty())
        .map(Answer::new)
}
