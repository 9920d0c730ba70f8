//! JSON-over-HTTP client shared by the four adapters.
//!
//! Every collaborator speaks the same protocol: a JSON `POST` to
//! `{base_url}{path}`, answered with a JSON body. A `204 No Content`, an
//! empty body, or a literal `null` all mean "no value" and decode to `None`.

use std::time::Duration;

use qaflow_types::EndpointConfig;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Result, ServiceError};

/// HTTP client bound to one collaborator endpoint.
#[derive(Debug)]
pub struct JsonClient {
    service: &'static str,
    endpoint: EndpointConfig,
    http: reqwest::Client,
}

impl JsonClient {
    /// Create a client for `endpoint`. `service` names it in logs and errors.
    ///
    /// The optional `timeout_secs` becomes the request timeout; a bearer key
    /// named by `api_key_env` is resolved at request time.
    pub fn new(service: &'static str, endpoint: EndpointConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = endpoint.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            service,
            endpoint,
            http: builder.build()?,
        })
    }

    /// Name of the service this client talks to.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Resolve the bearer key, if the endpoint wants one.
    fn resolve_api_key(&self) -> Result<Option<String>> {
        let Some(var) = self.endpoint.api_key_env.as_deref() else {
            return Ok(None);
        };
        std::env::var(var)
            .map(Some)
            .map_err(|_| ServiceError::NotConfigured(format!("set {var} env var")))
    }

    /// POST `body` and decode the response, or `None` for an empty answer.
    pub async fn post_json<Req, Resp>(&self, body: &Req) -> Result<Option<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint.url();
        debug!(service = self.service, url = %url, "sending request");

        let mut req = self
            .http
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = self.resolve_api_key()? {
            req = req.header("Authorization", format!("Bearer {key}"));
        }
        for (k, v) in &self.endpoint.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                service = self.service,
                status = status.as_u16(),
                "service returned an error status"
            );
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ServiceError::AuthFailed(body));
            }
            return Err(ServiceError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        if status == StatusCode::NO_CONTENT {
            debug!(service = self.service, "empty response");
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        let decoded = decode_body(&bytes)?;
        debug!(
            service = self.service,
            bytes = bytes.len(),
            empty = decoded.is_none(),
            "response received"
        );
        Ok(decoded)
    }
}

/// Decode a response body. Blank and `null` bodies are `None`.
pub(crate) fn decode_body<Resp: DeserializeOwned>(bytes: &[u8]) -> Result<Option<Resp>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| ServiceError::InvalidResponse(format!("failed to parse response: {e}")))?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ServiceError::InvalidResponse(format!("unexpected response shape: {e}")))
}
