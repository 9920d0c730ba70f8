//! Sensitive-content detection adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qaflow_core::Moderator;
use qaflow_types::{CollaboratorResult, EndpointConfig, ModerationVerdict, QueryContext};

use crate::client::JsonClient;
use crate::error::{Result, ServiceError};

/// Label the detector assigns to harmless text.
const SAFE_LABEL: &str = "SAFE";

#[derive(Serialize)]
struct DetectionRequest<'a> {
    query: &'a str,
    user_id: &'a str,
}

#[derive(Deserialize)]
struct DetectionResponse {
    sensitivity: String,
    #[serde(default)]
    model_name: Option<String>,
}

/// [`Moderator`] backed by an HTTP sensitive-content detector.
#[derive(Debug)]
pub struct HttpModerator {
    client: JsonClient,
}

impl HttpModerator {
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self {
            client: JsonClient::new("moderation", endpoint)?,
        })
    }
}

#[async_trait]
impl Moderator for HttpModerator {
    async fn check(
        &self,
        text: &str,
        context: &QueryContext,
    ) -> CollaboratorResult<ModerationVerdict> {
        let request = DetectionRequest {
            query: text,
            user_id: &context.user_id,
        };
        let response: DetectionResponse = self
            .client
            .post_json(&request)
            .await?
            .ok_or_else(|| ServiceError::InvalidResponse("empty moderation response".into()))?;
        Ok(verdict(response))
    }
}

/// Anything but the safe label is sensitive; the label becomes the reason.
fn verdict(response: DetectionResponse) -> ModerationVerdict {
    let label = response.sensitivity.trim();
    let mut verdict = if label.eq_ignore_ascii_case(SAFE_LABEL) {
        ModerationVerdict::safe()
    } else {
        ModerationVerdict::sensitive(label)
    };
    verdict.model = response.model_name;
    verdict
}
