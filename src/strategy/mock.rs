use super::GenerateStrategy;
use crate::models::JobRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockOutcome {
    Success(String),
    Transport(String),
    RemoteJob(String),
    Timeout(u32),
    Empty,
}

/// Scripted strategy for orchestrator tests: queued outcomes are replayed
/// in order (cycling), and every call is counted.
#[derive(Clone)]
pub struct MockStrategy {
    name: String,
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockStrategy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_success(self, url: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Success(url.to_string()));
        self
    }

    pub fn with_transport_failure(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Transport(message.to_string()));
        self
    }

    pub fn with_remote_failure(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::RemoteJob(message.to_string()));
        self
    }

    pub fn with_timeout(self, attempts: u32) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Timeout(attempts));
        self
    }

    pub fn with_empty_result(self) -> Self {
        self.outcomes.lock().unwrap().push(MockOutcome::Empty);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl GenerateStrategy for MockStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, _request: &JobRequest) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(format!("https://mock/{}.png", self.name));
        }

        let index = (*count - 1) % outcomes.len();
        match outcomes[index].clone() {
            MockOutcome::Success(url) => Ok(url),
            MockOutcome::Transport(message) => Err(Error::Transport(message)),
            MockOutcome::RemoteJob(message) => Err(Error::RemoteJob(message)),
            MockOutcome::Timeout(attempts) => Err(Error::Timeout(attempts)),
            MockOutcome::Empty => Err(Error::EmptyResult),
        }
    }
}
