use async_trait::async_trait;
use fitlens_functions::{
    Error, Result,
    llm::{LlmClient, Part},
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// Mock LLM client recording every prompt it receives
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<String>>>,
    pub requests: Arc<Mutex<Vec<Vec<Part>>>>,
    pub error: Option<String>,
    pub delay: Option<Duration>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Sleeps on the tokio clock before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_requests(&self) -> Vec<Vec<Part>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        self.requests.lock().unwrap().push(parts);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}
