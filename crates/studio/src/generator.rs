//! HTTP client for the layout generator service.

use std::time::Duration;

use serde_json::Value;
use shared::{GenerateRequest, GenerateResponse};

use crate::error::GeneratorError;
use crate::state::settings::GeneratorSettings;

#[derive(Clone)]
pub struct GeneratorClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeneratorClient {
    pub fn new(settings: &GeneratorSettings) -> Result<Self, GeneratorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a prompt and return the generator's layout payload, unvalidated.
    pub async fn generate(&self, prompt: &str) -> Result<Value, GeneratorError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GenerateRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Status(status));
        }
        let body: GenerateResponse = response.json().await?;
        Ok(body.layout)
    }
}
