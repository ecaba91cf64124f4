//! OpenAI Responses API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::Evaluator;
use crate::config::EvaluationConfig;
use crate::error::{Error, Result};

/// Evaluates prompts with an OpenAI model through `POST /responses`
pub struct OpenAiEvaluator {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiEvaluator {
    /// Create a new evaluator from configuration
    pub fn new(config: &EvaluationConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/responses", config.base_url),
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Evaluator for OpenAiEvaluator {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn evaluate(&self, prompt: &str) -> Result<String> {
        let request = ResponsesRequest {
            model: &self.model,
            input: prompt,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::evaluation(format!("OpenAI returned {status}: {body}")));
        }

        let reply: ResponsesReply = response.json().await?;
        let text = reply.into_text();
        debug!(chars = text.len(), "Evaluation received");

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesReply {
    /// Aggregated answer text: `output_text` when the API provides it,
    /// otherwise every `output_text` content part joined in order.
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .into_iter()
            .flat_map(|item| item.content.unwrap_or_default())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}
