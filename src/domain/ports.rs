use crate::domain::model::WebhookMessage;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn webhook_url(&self) -> Option<&str>;
    fn webhook_timeout(&self) -> Duration;
    fn default_username(&self) -> &str;
    fn rules_file(&self) -> Option<&str>;
}

/// 把修正後的內容轉送出去 (目前只有 Discord webhook)
#[async_trait]
pub trait Relay: Send + Sync {
    /// `false` 時 handler 完全不會呼叫 `send`
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, message: &WebhookMessage) -> Result<()>;
}
