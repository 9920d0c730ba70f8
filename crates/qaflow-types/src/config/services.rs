//! Collaborator endpoint configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};

/// Endpoints for the four external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Sensitive-content detection service.
    #[serde(default = "default_moderation")]
    pub moderation: EndpointConfig,

    /// Paraphrase (gold-standard answer) service.
    #[serde(default = "default_paraphrase")]
    pub paraphrase: EndpointConfig,

    /// Document prefiltering service.
    #[serde(default = "default_prefilter")]
    pub prefilter: EndpointConfig,

    /// Question-answering model service.
    #[serde(default = "default_inference")]
    pub inference: EndpointConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            moderation: default_moderation(),
            paraphrase: default_paraphrase(),
            prefilter: default_prefilter(),
            inference: default_inference(),
        }
    }
}

impl ServicesConfig {
    /// Iterate over `(name, endpoint)` pairs.
    pub fn endpoints(&self) -> [(&'static str, &EndpointConfig); 4] {
        [
            ("moderation", &self.moderation),
            ("paraphrase", &self.paraphrase),
            ("prefilter", &self.prefilter),
            ("inference", &self.inference),
        ]
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, endpoint) in self.endpoints() {
            if endpoint.base_url.trim().is_empty() {
                return Err(QaError::ConfigInvalid {
                    reason: format!("services.{name}.base_url is empty"),
                });
            }
            if endpoint.timeout_secs == Some(0) {
                return Err(QaError::ConfigInvalid {
                    reason: format!("services.{name}.timeout_secs must be > 0"),
                });
            }
        }
        Ok(())
    }
}

/// How to reach one collaborator over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Scheme, host and optional prefix (e.g. `"http://scd:8080/v1"`).
    #[serde(alias = "baseUrl")]
    pub base_url: String,

    /// Request path appended to `base_url`.
    #[serde(default)]
    pub path: String,

    /// Environment variable holding a bearer token, if the service wants one.
    #[serde(default, alias = "apiKeyEnv")]
    pub api_key_env: Option<String>,

    /// Client-side request timeout in seconds.
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl EndpointConfig {
    /// An endpoint with no auth, timeout or extra headers.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            api_key_env: None,
            timeout_secs: None,
            headers: HashMap::new(),
        }
    }

    /// Full request URL.
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            return base.to_string();
        }
        let path = self.path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn default_moderation() -> EndpointConfig {
    EndpointConfig::new("http://localhost:8081", "/sensitive-content-detection")
}
fn default_paraphrase() -> EndpointConfig {
    EndpointConfig::new("http://localhost:8082", "/paraphrase")
}
fn default_prefilter() -> EndpointConfig {
    EndpointConfig::new("http://localhost:8083", "/prefilter")
}
fn default_inference() -> EndpointConfig {
    EndpointConfig::new("http://localhost:8084", "/infer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let ep = EndpointConfig::new("http://qa:9000/", "/infer");
        assert_eq!(ep.url(), "http://qa:9000/infer");
        let ep = EndpointConfig::new("http://qa:9000/v1", "infer");
        assert_eq!(ep.url(), "http://qa:9000/v1/infer");
        let ep = EndpointConfig::new("http://qa:9000/v1/infer", "");
        assert_eq!(ep.url(), "http://qa:9000/v1/infer");
    }

    #[test]
    fn partial_services_keep_other_defaults() {
        let cfg: ServicesConfig = serde_json::from_str(
            r#"{"inference": {"baseUrl": "http://gpu:7000", "path": "/qa", "apiKeyEnv": "QA_KEY"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.inference.url(), "http://gpu:7000/qa");
        assert_eq!(cfg.inference.api_key_env.as_deref(), Some("QA_KEY"));
        assert_eq!(cfg.paraphrase.url(), "http://localhost:8082/paraphrase");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut cfg = ServicesConfig::default();
        cfg.prefilter.base_url = "  ".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: services.prefilter.base_url is empty"
        );
    }
}
