use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Thin HTTP client for the predictions API. The credential is supplied
/// per call because it belongs to the caller, not the process.
pub struct ReplicateHttpClient {
    client: Client,
    base_url: String,
}

impl ReplicateHttpClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", token))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", url, e);
                e
            })?;

        Self::parse_response(response).await
    }

    pub async fn get<Resp: DeserializeOwned>(&self, path: &str, token: &str) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", url, e);
                e
            })?;

        Self::parse_response(response).await
    }

    async fn parse_response<Resp: DeserializeOwned>(response: reqwest::Response) -> Result<Resp> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body).unwrap_or_else(|| {
                format!("API error (status {})", status)
            });
            tracing::error!("Predictions API error (status {}): {}", status, body);
            return Err(auth_aware_transport_error(status, detail));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse API response: {}\nBody: {}", e, body);
            Error::Transport(format!("Failed to parse API response: {}", e))
        })
    }
}

/// Remote error bodies carry a human-readable `detail` field.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(|s| s.to_string())
}

/// Credential rejections must stay recognizable in the message text, since
/// frontends re-prompt for an API key on that condition.
fn auth_aware_transport_error(status: StatusCode, detail: String) -> Error {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::Transport(format!("unauthorized: {}", detail))
    } else {
        Error::Transport(detail)
    }
}
