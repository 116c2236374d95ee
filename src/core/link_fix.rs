use crate::core::rewriter::RuleSet;
use crate::domain::model::{FixRequest, FixResponse, WebhookMessage, DEFAULT_USERNAME};
use crate::domain::ports::Relay;
use crate::utils::error::{LinkFixError, Result};
use std::sync::Arc;

/// 驗證 -> 選擇內容 -> 改寫 -> (選擇性) 轉送
pub struct LinkFixService<R: Relay> {
    rules: Arc<RuleSet>,
    relay: R,
    default_username: String,
}

impl<R: Relay> LinkFixService<R> {
    pub fn new(rules: Arc<RuleSet>, relay: R) -> Self {
        Self {
            rules,
            relay,
            default_username: DEFAULT_USERNAME.to_string(),
        }
    }

    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = username.into();
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub async fn process(&self, request: &FixRequest) -> Result<FixResponse> {
        let content = request
            .content()
            .ok_or_else(|| LinkFixError::validation("No URL or text provided"))?;

        let fixed = self.rules.fix_links(content);
        tracing::debug!("Fixed content: {} -> {}", content, fixed);

        if self.relay.is_enabled() {
            let message = WebhookMessage {
                content: fixed.clone(),
                username: request.display_name(&self.default_username).to_string(),
            };
            self.relay.send(&message).await?;
            tracing::debug!("Relayed fixed content as {}", message.username);
        }

        Ok(FixResponse {
            success: true,
            original: content.to_string(),
            fixed,
            platforms: self.rules.platforms(),
        })
    }
}
