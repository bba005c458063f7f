use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CategoryClassifier, ClassifierError};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    category: Option<String>,
}

/// Classifier backed by the remote prediction endpoint.
///
/// Sends `POST {"description": ...}` and expects `{"category": ...}` back.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClassifierError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl CategoryClassifier for HttpClassifier {
    fn classify(&self, description: &str) -> Result<String, ClassifierError> {
        debug!(endpoint = %self.endpoint, "requesting category prediction");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { description })
            .send()
            .map_err(|err| ClassifierError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body: PredictResponse = response
            .json()
            .map_err(|err| ClassifierError::Payload(err.to_string()))?;
        body.category
            .filter(|category| !category.trim().is_empty())
            .ok_or(ClassifierError::MissingCategory)
    }
}
