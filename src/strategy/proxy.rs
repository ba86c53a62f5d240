use super::GenerateStrategy;
use crate::models::{JobRequest, ProxyRequest, ProxyResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A transport that delegates submit+poll to an intermediary endpoint.
/// One POST carries the credential, model ref, and input; the proxy
/// answers with a `{success, data?, error?}` envelope.
pub struct ProxyStrategy {
    name: String,
    client: Client,
    endpoint: String,
}

impl ProxyStrategy {
    pub fn new(name: &str, endpoint: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            name: name.to_string(),
            client,
            endpoint,
        }
    }
}

#[async_trait]
impl GenerateStrategy for ProxyStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &JobRequest) -> Result<String> {
        tracing::debug!("Calling proxy {} at {}", self.name, self.endpoint);

        let body = ProxyRequest {
            api_key: &request.credential,
            model: request.model_ref.as_composite(),
            input: &request.input,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach proxy {}: {}", self.name, e);
                e
            })?;

        let status = response.status();
        let text = response.text().await?;

        // Proxies answer with the envelope on both success and failure
        // statuses, so decode the body before looking at the status code.
        let envelope: ProxyResponse = serde_json::from_str(&text).map_err(|_| {
            Error::Transport(format!(
                "Proxy {} returned an unexpected response (status {})",
                self.name, status
            ))
        })?;

        if !envelope.success {
            return Err(Error::Transport(
                envelope
                    .error
                    .unwrap_or_else(|| "Failed to generate image".to_string()),
            ));
        }

        envelope.data.ok_or(Error::EmptyResult)?.into_first()
    }
}
