//! Fallback orchestration for image generation requests.

use crate::models::{Config, GenerationOptions, JobRequest, StrategyResult};
use crate::strategy::{DirectStrategy, GenerateStrategy, PlaceholderStrategy, ProxyStrategy};
use crate::{Error, Result};
use std::time::Duration;
use tracing::{info, warn};

const PROXY_TIMEOUT: Duration = Duration::from_secs(60);

/// Tries an ordered list of transport strategies until one produces an
/// image URL. Holds no per-request state, so one instance can serve any
/// number of concurrent generations.
pub struct Generator {
    strategies: Vec<Box<dyn GenerateStrategy>>,
}

impl Generator {
    /// Build the orchestrator from explicit strategies, in try-order.
    ///
    /// This is primarily useful for tests and harnesses that need to
    /// inject mocks.
    pub fn with_strategies(strategies: Vec<Box<dyn GenerateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the standard chain from configuration: primary proxy,
    /// fallback proxy, direct API call, and (when allowed) the
    /// placeholder.
    pub fn from_config(config: &Config) -> Self {
        let mut strategies: Vec<Box<dyn GenerateStrategy>> = Vec::new();

        if let Some(url) = &config.proxy_primary_url {
            strategies.push(Box::new(ProxyStrategy::new(
                "proxy-primary",
                url.clone(),
                PROXY_TIMEOUT,
            )));
        }
        if let Some(url) = &config.proxy_fallback_url {
            strategies.push(Box::new(ProxyStrategy::new(
                "proxy-fallback",
                url.clone(),
                PROXY_TIMEOUT,
            )));
        }
        strategies.push(Box::new(DirectStrategy::new(
            config.api_base_url.clone(),
            config.poll_budget(),
        )));
        if config.allow_placeholder {
            info!("Placeholder fallback enabled; failures will degrade to a stock image");
            strategies.push(Box::new(PlaceholderStrategy));
        }

        Self::with_strategies(strategies)
    }

    /// Run one generation through the fallback chain.
    ///
    /// Returns `Err` only when the request itself is malformed, before
    /// any strategy runs. Every other outcome, including exhaustion of
    /// all strategies, is reported inside the [`StrategyResult`]
    /// envelope.
    pub async fn generate(
        &self,
        credential: &str,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<StrategyResult> {
        let request = JobRequest::new(credential.to_string(), model, prompt, options)?;

        let mut last_error: Option<String> = None;

        for strategy in &self.strategies {
            info!("Trying strategy: {}", strategy.name());

            match strategy.generate(&request).await {
                Ok(url) => {
                    info!("Strategy {} succeeded", strategy.name());
                    return Ok(StrategyResult::ok(url));
                }
                Err(e) if e.is_fallback_eligible() => {
                    warn!("Strategy {} failed: {}", strategy.name(), e);
                    last_error = Some(e.to_string());
                }
                Err(e @ Error::Validation(_)) => return Err(e),
                // A successful transport with an unusable payload is a
                // real outcome; later strategies must not paper over it.
                Err(e) => {
                    warn!("Strategy {} produced unusable result: {}", strategy.name(), e);
                    return Ok(StrategyResult::failed(e.to_string()));
                }
            }
        }

        Ok(StrategyResult::failed(last_error.unwrap_or_else(|| {
            "No generation strategies configured".to_string()
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{MockStrategy, PLACEHOLDER_IMAGE_URL};
    use pretty_assertions::assert_eq;

    fn default_options() -> GenerationOptions {
        GenerationOptions::default()
    }

    #[tokio::test]
    async fn test_first_success_short_circuits_remaining_strategies() {
        let first = MockStrategy::new("proxy-primary").with_transport_failure("proxy down");
        let second = MockStrategy::new("proxy-fallback").with_success("https://img/from-b.png");
        let third = MockStrategy::new("direct");
        let fourth = MockStrategy::new("placeholder");

        let generator = Generator::with_strategies(vec![
            Box::new(first.clone()),
            Box::new(second.clone()),
            Box::new(third.clone()),
            Box::new(fourth.clone()),
        ]);

        let result = generator
            .generate("token", "a cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.as_deref(), Some("https://img/from-b.png"));
        assert_eq!(first.get_call_count(), 1);
        assert_eq!(second.get_call_count(), 1);
        assert_eq!(third.get_call_count(), 0);
        assert_eq!(fourth.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_model_fails_before_any_strategy_runs() {
        let only = MockStrategy::new("proxy-primary");
        let generator = Generator::with_strategies(vec![Box::new(only.clone())]);

        let err = generator
            .generate("token", "a cat", ":v", &default_options())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(only.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_chain_ending_in_placeholder_always_resolves() {
        let generator = Generator::with_strategies(vec![
            Box::new(MockStrategy::new("proxy-primary").with_transport_failure("down")),
            Box::new(MockStrategy::new("direct").with_timeout(30)),
            Box::new(PlaceholderStrategy),
        ]);

        let result = generator
            .generate("token", "a cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.as_deref(), Some(PLACEHOLDER_IMAGE_URL));
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_last_failure() {
        let generator = Generator::with_strategies(vec![
            Box::new(MockStrategy::new("proxy-primary").with_transport_failure("proxy down")),
            Box::new(MockStrategy::new("direct").with_remote_failure("NSFW content detected")),
        ]);

        let result = generator
            .generate("token", "a cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("NSFW content detected"));
    }

    #[tokio::test]
    async fn test_empty_result_stops_the_chain() {
        let second = MockStrategy::new("direct").with_success("https://img/late.png");
        let generator = Generator::with_strategies(vec![
            Box::new(MockStrategy::new("proxy-primary").with_empty_result()),
            Box::new(second.clone()),
        ]);

        let result = generator
            .generate("token", "a cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(second.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_auth_failures_stay_recognizable_to_the_caller() {
        let generator = Generator::with_strategies(vec![
            Box::new(MockStrategy::new("proxy-primary").with_transport_failure("API key is required")),
            Box::new(
                MockStrategy::new("direct")
                    .with_transport_failure("unauthorized: invalid authentication token"),
            ),
        ]);

        let result = generator
            .generate("bad", "cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.is_auth_failure());
    }

    #[tokio::test]
    async fn test_empty_chain_reports_configuration_problem() {
        let generator = Generator::with_strategies(vec![]);

        let result = generator
            .generate("token", "a cat", "m:v", &default_options())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("No generation strategies"));
    }
}
