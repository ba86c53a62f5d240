use super::client::ReplicateHttpClient;
use crate::models::{CreatePredictionRequest, JobRequest, PollBudget, Prediction, PredictionStatus};
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

const PREDICTIONS_PATH: &str = "/v1/predictions";

/// Submits prediction jobs and polls them to a terminal state.
pub struct PredictionsClient {
    http: ReplicateHttpClient,
}

impl PredictionsClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: ReplicateHttpClient::new(timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Create a prediction job. Fails with a validation error before any
    /// network call when the model ref carries no version, since the
    /// creation payload requires one.
    pub async fn submit(&self, request: &JobRequest) -> Result<Prediction> {
        let version = request.model_ref.version.clone().ok_or_else(|| {
            Error::Validation(format!(
                "Invalid model format '{}'. Expected 'model:version'",
                request.model_ref.as_composite()
            ))
        })?;

        debug!("Creating prediction for model {}", request.model_ref.name);

        let body = CreatePredictionRequest {
            version,
            input: request.input.clone(),
        };
        let prediction: Prediction = self
            .http
            .post(PREDICTIONS_PATH, &request.credential, &body)
            .await?;

        info!("Prediction created with ID: {}", prediction.id);
        Ok(prediction)
    }

    /// Re-fetch the current state of a prediction by id.
    pub async fn fetch(&self, id: &str, token: &str) -> Result<Prediction> {
        let path = format!("{}/{}", PREDICTIONS_PATH, id);
        self.http.get(&path, token).await
    }

    /// Poll a prediction until it reaches a terminal state or the budget
    /// is exhausted. Status checks are strictly sequential; nothing is
    /// shared across concurrent poll loops.
    pub async fn poll(
        &self,
        prediction: Prediction,
        token: &str,
        budget: &PollBudget,
    ) -> Result<Prediction> {
        let id = prediction.id.clone();
        let mut current = prediction;

        let mut attempts = 0;
        while !current.status.is_terminal() && attempts < budget.max_attempts {
            attempts += 1;
            debug!("Polling attempt {} for prediction {}", attempts, id);

            tokio::time::sleep(budget.interval).await;
            current = self.fetch(&id, token).await?;
        }

        match current.status {
            PredictionStatus::Succeeded => {
                info!("Prediction {} succeeded after {} checks", id, attempts);
                Ok(current)
            }
            PredictionStatus::Failed => Err(Error::RemoteJob(
                current
                    .error
                    .unwrap_or_else(|| "Prediction failed".to_string()),
            )),
            // Budget exhausted without a terminal status: stop polling and
            // abandon the job; no cancellation is sent to the remote side.
            _ => Err(Error::Timeout(budget.max_attempts)),
        }
    }
}
