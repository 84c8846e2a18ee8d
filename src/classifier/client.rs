//! HTTP client for OpenAI-compatible chat-completions endpoints

use super::prompt::{compliance_request, identifier_request};
use super::response::{message_content, parse_compliance, parse_identifiers};
use super::{ClassifierError, IdentifierReport, RemoteClassifier};
use crate::config::LlmConfig;
use crate::screening::ComplianceResult;
use async_trait::async_trait;

/// Remote classifier backed by `reqwest`.
///
/// One connection pool is shared across requests; the timeout comes from
/// the per-call [`LlmConfig`], so overrides take effect immediately.
#[derive(Debug, Clone, Default)]
pub struct HttpClassifier {
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (shared pool, custom TLS and so on)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST a chat request and return the assistant message content.
    async fn complete(
        &self,
        config: &LlmConfig,
        body: &serde_json::Value,
    ) -> Result<String, ClassifierError> {
        if !config.is_configured() {
            return Err(ClassifierError::Configuration);
        }

        tracing::debug!(
            url = %config.url,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "Calling remote classifier"
        );

        let response = self
            .client
            .post(&config.url)
            .bearer_auth(config.key.expose())
            .timeout(config.timeout())
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(map_transport_error)?;
        message_content(&text)
    }
}

fn map_transport_error(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else if e.is_connect() {
        ClassifierError::Connection
    } else {
        ClassifierError::Unexpected(e.to_string())
    }
}

#[async_trait]
impl RemoteClassifier for HttpClassifier {
    async fn classify(
        &self,
        content: &str,
        config: &LlmConfig,
    ) -> Result<ComplianceResult, ClassifierError> {
        let body = compliance_request(&config.model, content);
        let message = self.complete(config, &body).await?;
        parse_compliance(&message)
    }

    async fn extract_identifiers(
        &self,
        content: &str,
        config: &LlmConfig,
    ) -> Result<IdentifierReport, ClassifierError> {
        let body = identifier_request(&config.model, content);
        let message = self.complete(config, &body).await?;
        parse_identifiers(&message)
    }

    fn name(&self) -> &str {
        "http"
    }
}
