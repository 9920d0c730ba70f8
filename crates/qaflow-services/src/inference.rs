//! Question-answering model adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use qaflow_core::InferenceEngine;
use qaflow_types::{Answer, CollaboratorResult, EndpointConfig, Language, PrefilteredQuery};

use crate::client::JsonClient;
use crate::error::{Result, ServiceError};

#[derive(Serialize)]
struct InferenceRequest<'a> {
    query: &'a str,
    doc: &'a Value,
    user_id: &'a str,
    language: Language,
}

#[derive(Deserialize)]
struct InferenceResponse {
    answer: String,
    #[serde(default)]
    model_context: Option<ModelContext>,
}

#[derive(Deserialize)]
struct ModelContext {
    #[serde(default)]
    model_name: Option<String>,
}

/// [`InferenceEngine`] backed by an HTTP question-answering service.
///
/// Grounds the answer on the first prefiltered document.
#[derive(Debug)]
pub struct HttpInferenceEngine {
    client: JsonClient,
}

impl HttpInferenceEngine {
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self {
            client: JsonClient::new("inference", endpoint)?,
        })
    }
}

#[async_trait]
impl InferenceEngine for HttpInferenceEngine {
    async fn infer(&self, input: PrefilteredQuery) -> CollaboratorResult<Answer> {
        let Some(document) = input.documents.first() else {
            return Err(ServiceError::RequestFailed(
                "no grounding document to send to inference".into(),
            )
            .into());
        };
        let request = InferenceRequest {
            query: &input.text,
            doc: &document.body,
            user_id: &input.context.user_id,
            language: input.context.language,
        };
        let response: InferenceResponse = self
            .client
            .post_json(&request)
            .await?
            .ok_or_else(|| ServiceError::InvalidResponse("empty inference response".into()))?;

        let mut answer = Answer::new(response.answer);
        answer.model = response.model_context.and_then(|ctx| ctx.model_name);
        Ok(answer)
    }
}
