//! Data models and structures
//!
//! Defines the core data structures for generation requests, prediction
//! lifecycle, and the wire formats of the predictions API and proxy.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A model reference, optionally pinned to a version (`name:version`).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRef {
    pub name: String,
    pub version: Option<String>,
}

impl ModelRef {
    /// Parse a caller-supplied model string.
    ///
    /// A composite ref must split into exactly two non-empty parts on the
    /// first ':'. A bare name is accepted here; transports that need a
    /// version enforce that themselves.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once(':') {
            Some((name, version)) => {
                if name.is_empty() || version.is_empty() {
                    return Err(Error::Validation(format!(
                        "Invalid model format '{}'. Expected 'model:version'",
                        raw
                    )));
                }
                Ok(Self {
                    name: name.to_string(),
                    version: Some(version.to_string()),
                })
            }
            None => {
                if raw.is_empty() {
                    return Err(Error::Validation("Model is required".to_string()));
                }
                Ok(Self {
                    name: raw.to_string(),
                    version: None,
                })
            }
        }
    }

    /// The composite string form sent to proxies.
    pub fn as_composite(&self) -> String {
        match &self.version {
            Some(version) => format!("{}:{}", self.name, version),
            None => self.name.clone(),
        }
    }
}

/// Optional tuning knobs for a generation, mirroring the advanced controls
/// a frontend exposes. Unset fields are omitted from the wire payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationOptions {
    pub negative_prompt: Option<String>,
    pub num_inference_steps: Option<u32>,
    pub guidance_scale: Option<f64>,
}

/// The `input` mapping of a prediction creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f64>,
}

/// A fully validated generation request, handed to each strategy in turn.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub credential: String,
    pub model_ref: ModelRef,
    pub input: PredictionInput,
}

impl JobRequest {
    pub fn new(
        credential: String,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Self> {
        if prompt.trim().is_empty() {
            return Err(Error::Validation("Prompt is required".to_string()));
        }
        if credential.is_empty() {
            return Err(Error::Validation("API key is required".to_string()));
        }

        Ok(Self {
            credential,
            model_ref: ModelRef::parse(model)?,
            input: PredictionInput {
                prompt: prompt.to_string(),
                negative_prompt: options.negative_prompt.clone(),
                num_inference_steps: options.num_inference_steps,
                guidance_scale: options.guidance_scale,
            },
        })
    }
}

// Predictions API request/response models

#[derive(Debug, Serialize)]
pub struct CreatePredictionRequest {
    pub version: String,
    pub input: PredictionInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    #[serde(alias = "starting")]
    Pending,
    Processing,
    Succeeded,
    #[serde(alias = "canceled")]
    Failed,
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PredictionStatus::Succeeded | PredictionStatus::Failed)
    }
}

/// One remote inference job. Created by submission, refreshed by polling,
/// discarded once its output has been normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<ImageOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Model output as it appears on the wire: some models return a single
/// URL, others an ordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageOutput {
    Many(Vec<String>),
    Single(String),
}

impl ImageOutput {
    /// Normalize to one usable image URL: the first element of a list, or
    /// the single value as-is.
    pub fn into_first(self) -> Result<String> {
        match self {
            ImageOutput::Many(urls) => urls.into_iter().next().ok_or(Error::EmptyResult),
            ImageOutput::Single(url) => {
                if url.is_empty() {
                    Err(Error::EmptyResult)
                } else {
                    Ok(url)
                }
            }
        }
    }
}

// Proxy wire contract: the intermediary performs submit+poll server-side.

#[derive(Debug, Serialize)]
pub struct ProxyRequest<'a> {
    #[serde(rename = "apiKey")]
    pub api_key: &'a str,
    pub model: String,
    pub input: &'a PredictionInput,
}

#[derive(Debug, Deserialize)]
pub struct ProxyResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ImageOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The uniform envelope returned to the caller, whatever transport
/// produced it.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    pub success: bool,
    pub data: Option<String>,
    pub error: Option<String>,
}

impl StrategyResult {
    pub fn ok(url: String) -> Self {
        Self {
            success: true,
            data: Some(url),
            error: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    /// Whether the failure looks credential-related. Frontends re-prompt
    /// for an API key on this condition, matching on the message text.
    pub fn is_auth_failure(&self) -> bool {
        let Some(error) = &self.error else {
            return false;
        };
        let lowered = error.to_lowercase();
        ["unauthorized", "auth", "key"]
            .iter()
            .any(|token| lowered.contains(token))
    }
}

/// Interval and attempt-count limits governing one poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_attempts: 30,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub proxy_primary_url: Option<String>,
    pub proxy_fallback_url: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub allow_placeholder: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_base_url: std::env::var("REPLICATE_API_BASE")
                .unwrap_or_else(|_| "https://api.replicate.com".to_string()),
            proxy_primary_url: std::env::var("PROXY_PRIMARY_URL").ok(),
            proxy_fallback_url: std::env::var("PROXY_FALLBACK_URL").ok(),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            poll_max_attempts: std::env::var("POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            allow_placeholder: std::env::var("ALLOW_PLACEHOLDER")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    pub fn poll_budget(&self) -> PollBudget {
        PollBudget {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }
}
