use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use log::debug;

#[async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    reply: Option<String>,
    error: Option<String>,
}

// HTTP client for the relay's `/api/chat`.
#[derive(Clone)]
pub struct RelayClient {
    base_url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl Relay for RelayClient {
    async fn send(&self, message: &str) -> Result<String> {
        let response = self.client.post(self.chat_url())
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;

        let status = response.status();
        let body: RelayReply = response.json().await?;
        debug!("Relay answered {}", status);

        match body {
            RelayReply { reply: Some(reply), .. } if status.is_success() => Ok(reply),
            RelayReply { error: Some(error), .. } => Err(anyhow!("Relay error {}: {}", status, error)),
            _ => Err(anyhow!("Relay returned {} without a reply", status)),
        }
    }
}
