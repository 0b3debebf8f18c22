//! HTTP client for the breed inference service.
//!
//! The service takes one `multipart/form-data` upload under the field
//! name `file` and answers with JSON predictions plus an opaque
//! analysis payload.

use crate::model::{RequestConfig, SelectedPhoto, ServiceResponse};
use anyhow::Context;
use reqwest::{multipart, Body, Client, StatusCode};
use thiserror::Error;

/// Errors from a single request cycle. Presentation layers collapse all
/// of these into one fixed alert string; the variants only feed tracing
/// output and exit codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unreachable")]
    Unreachable(#[source] reqwest::Error),
    #[error("request failed")]
    Transport(#[source] reqwest::Error),
    #[error("service returned {status}")]
    Status { status: StatusCode },
    #[error("malformed response body")]
    Malformed(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    service_url: String,
}

impl ServiceClient {
    /// Build the underlying HTTP client. No request timeout is set: a
    /// cycle stays in flight until the server answers or the connection
    /// drops, and a newer cycle simply supersedes it.
    pub fn new(cfg: &RequestConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            service_url: cfg.service_url.clone(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// POST the photo and decode the JSON reply. Non-2xx statuses are
    /// errors even when the body parses.
    pub async fn predict(&self, photo: &SelectedPhoto) -> Result<ServiceResponse, ServiceError> {
        let part = multipart::Part::stream(Body::from(photo.data.clone()))
            .file_name(photo.file_name.clone())
            .mime_str(photo.mime)
            .map_err(ServiceError::Transport)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.service_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ServiceError::Unreachable(e)
                } else {
                    ServiceError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("service returned {}: {}", status, body.trim());
            return Err(ServiceError::Status { status });
        }

        response
            .json::<ServiceResponse>()
            .await
            .map_err(ServiceError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::ServiceResponse;

    #[test]
    fn missing_predictions_decode_to_empty_list() {
        let resp: ServiceResponse =
            serde_json::from_str(r#"{"breed_analysis":{"note":"hi"}}"#).unwrap();
        assert!(resp.predictions.is_empty());
        assert!(resp.breed_analysis.is_some());
    }

    #[test]
    fn missing_analysis_decodes_to_none() {
        let resp: ServiceResponse =
            serde_json::from_str(r#"{"predictions":[{"breed":"Pug","confidence":0.9}]}"#).unwrap();
        assert_eq!(resp.predictions.len(), 1);
        assert_eq!(resp.predictions[0].breed, "Pug");
        assert!(resp.breed_analysis.is_none());
    }

    #[test]
    fn null_analysis_decodes_to_none() {
        let resp: ServiceResponse =
            serde_json::from_str(r#"{"predictions":[],"breed_analysis":null}"#).unwrap();
        assert!(resp.breed_analysis.is_none());
    }

    #[test]
    fn null_predictions_decode_to_empty_list() {
        let resp: ServiceResponse = serde_json::from_str(r#"{"predictions":null}"#).unwrap();
        assert!(resp.predictions.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let resp: ServiceResponse = serde_json::from_str(
            r#"{"predictions":[{"breed":"Akita","confidence":0.5}],"model_version":"v3"}"#,
        )
        .unwrap();
        assert_eq!(resp.predictions[0].breed, "Akita");
    }

    #[test]
    fn empty_object_decodes_to_defaults() {
        let resp: ServiceResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.predictions.is_empty());
        assert!(resp.breed_analysis.is_none());
    }
}
