use crate::core::{Relay, WebhookMessage};
use crate::utils::error::{LinkFixError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Discord webhook relay. Without a URL it is disabled and never sends.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: Option<String>,
    timeout: Duration,
    client: Client,
}

impl DiscordWebhook {
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self {
            url: url.filter(|u| !u.is_empty()),
            timeout,
            client: Client::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(10))
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

#[async_trait]
impl Relay for DiscordWebhook {
    fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    async fn send(&self, message: &WebhookMessage) -> Result<()> {
        let Some(url) = self.url.as_deref() else {
            return Ok(());
        };

        tracing::debug!("Posting to webhook as {}", message.username);
        let request = self.client.post(url).json(message).send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| LinkFixError::WebhookTimeout {
                seconds: self.timeout.as_secs(),
            })??;

        // 不讀取回應內容；非 2xx 只記錄
        if !response.status().is_success() {
            tracing::warn!("⚠️ Webhook responded with status {}", response.status());
        }

        Ok(())
    }
}
