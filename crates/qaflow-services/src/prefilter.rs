//! Document prefilter adapter.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use qaflow_core::Prefilter;
use qaflow_types::{
    CollaboratorResult, ContextDocument, EndpointConfig, Language, PrefilteredQuery, Query,
};

use crate::client::JsonClient;
use crate::error::{Result, ServiceError};

#[derive(Serialize)]
struct PrefilterRequest<'a> {
    query: &'a str,
    language: Language,
    coursebook_ids: [&'a str; 1],
}

/// [`Prefilter`] backed by an HTTP document-selection service.
///
/// The service answers with the single most relevant document, or with
/// `null` / `{}` / nothing when the course material has no match.
#[derive(Debug)]
pub struct HttpPrefilter {
    client: JsonClient,
}

impl HttpPrefilter {
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self {
            client: JsonClient::new("prefilter", endpoint)?,
        })
    }
}

#[async_trait]
impl Prefilter for HttpPrefilter {
    async fn apply(&self, query: &Query) -> CollaboratorResult<PrefilteredQuery> {
        let context = query.context();
        let request = PrefilterRequest {
            query: query.text(),
            language: context.language,
            coursebook_ids: [context.course_id.as_str()],
        };
        let response: Option<Value> = self.client.post_json(&request).await?;
        let documents = match response {
            Some(body) => documents(body)?,
            None => Vec::new(),
        };
        Ok(PrefilteredQuery {
            text: query.text().to_string(),
            context: context.clone(),
            documents,
        })
    }
}

fn documents(body: Value) -> Result<Vec<ContextDocument>> {
    let Value::Object(fields) = &body else {
        return Err(ServiceError::InvalidResponse(format!(
            "expected a document object, got {body}"
        )));
    };
    if fields.is_empty() {
        return Ok(Vec::new());
    }
    let id = match fields.get("doc_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(ServiceError::InvalidResponse(
                "document is missing doc_id".into(),
            ));
        }
    };
    Ok(vec![ContextDocument { id, body }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_means_no_documents() {
        assert!(documents(json!({})).unwrap().is_empty());
    }

    #[test]
    fn object_with_doc_id_is_one_document() {
        let docs = documents(json!({"doc_id": "ch3-p12", "text": "..."})).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "ch3-p12");
        assert_eq!(docs[0].body["text"], "...");
    }

    #[test]
    fn numeric_doc_id_is_accepted() {
        let docs = documents(json!({"doc_id": 42})).unwrap();
        assert_eq!(docs[0].id, "42");
    }

    #[test]
    fn object_without_doc_id_is_invalid() {
        let err = documents(json!({"text": "orphan"})).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[test]
    fn non_object_is_invalid() {
        assert!(documents(json!(["a", "b"])).is_err());
    }

    #[test]
    fn request_wraps_course_in_list() {
        let request = PrefilterRequest {
            query: "q",
            language: Language::De,
            coursebook_ids: ["course-1"],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({"query": "q", "language": "de", "coursebook_ids": ["course-1"]})
        );
    }
}
