use std::sync::Arc;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use log::{info, debug};

use crate::config::Settings;

// Anything that can turn a single user turn into a completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate_response(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Client for an OpenAI-compatible chat completion API
pub struct OpenAiModel {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiModel {
    pub fn new(settings: &Settings) -> Result<Self> {
        info!("Initializing upstream completion client");
        info!("Using completion API at: {} (model: {})", settings.base_url, settings.model);

        let mut builder = Client::builder();
        if let Some(timeout) = settings.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn generate_response(&self, prompt: &str) -> Result<String> {
        debug!("Prompt: {}", prompt);

        let payload = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self.client.post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Completion API error {}: {}", status, error_text));
        }

        let completion: CompletionResponse = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Completion API returned no choices"))?
            .message
            .content
            .unwrap_or_default();

        debug!("Response length: {} characters", content.len());
        Ok(content)
    }
}

// Shared handle to whichever model the server talks to
#[derive(Clone)]
pub struct ModelManager {
    pub model: Arc<dyn ChatModel>,
}

impl ModelManager {
    pub fn new(settings: &Settings) -> Result<Self> {
        let model = OpenAiModel::new(settings)?;
        Ok(Self::with_model(Arc::new(model)))
    }

    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}
