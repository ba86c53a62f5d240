use super::GenerateStrategy;
use crate::models::{JobRequest, PollBudget};
use crate::replicate::PredictionsClient;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// The direct transport: submit a prediction to the API ourselves, then
/// poll it to a terminal state within the configured budget.
pub struct DirectStrategy {
    predictions: PredictionsClient,
    budget: PollBudget,
}

impl DirectStrategy {
    pub fn new(api_base_url: String, budget: PollBudget) -> Self {
        Self {
            predictions: PredictionsClient::new(Duration::from_secs(30))
                .with_base_url(api_base_url),
            budget,
        }
    }
}

#[async_trait]
impl GenerateStrategy for DirectStrategy {
    fn name(&self) -> &str {
        "direct"
    }

    async fn generate(&self, request: &JobRequest) -> Result<String> {
        let prediction = self.predictions.submit(request).await?;
        let terminal = self
            .predictions
            .poll(prediction, &request.credential, &self.budget)
            .await?;

        terminal.output.ok_or(Error::EmptyResult)?.into_first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationOptions;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> JobRequest {
        JobRequest::new(
            "test-token".to_string(),
            "stability-ai/sdxl:39ed52f2",
            "a cat",
            &GenerationOptions::default(),
        )
        .unwrap()
    }

    fn test_budget() -> PollBudget {
        PollBudget {
            interval: Duration::from_millis(5),
            max_attempts: 10,
        }
    }

    #[tokio::test]
    async fn test_direct_submits_polls_and_normalizes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "pred-1",
                "status": "starting"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pred-1",
                "status": "succeeded",
                "output": ["https://img/a.png"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = DirectStrategy::new(server.uri(), test_budget());
        let url = strategy.generate(&test_request()).await.unwrap();
        assert_eq!(url, "https://img/a.png");
    }

    #[tokio::test]
    async fn test_direct_succeeded_without_output_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "pred-1",
                "status": "starting"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pred-1",
                "status": "succeeded"
            })))
            .mount(&server)
            .await;

        let strategy = DirectStrategy::new(server.uri(), test_budget());
        let err = strategy.generate(&test_request()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }
}
