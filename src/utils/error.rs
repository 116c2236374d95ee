use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkFixError {
    #[error("Webhook request failed: {0}")]
    WebhookError(#[from] reqwest::Error),

    #[error("Webhook request timed out after {seconds}s")]
    WebhookTimeout { seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rule conflict: {message}")]
    RuleConflict { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端送來的資料有誤
    Request,
    /// Webhook 等外部服務
    Upstream,
    /// 啟動設定
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LinkFixError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Request,
            Self::WebhookError(_) | Self::WebhookTimeout { .. } => ErrorCategory::Upstream,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::RuleConflict { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Request
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::WebhookError(_) => "Check that DISCORD_WEBHOOK_URL points to a reachable webhook",
            Self::WebhookTimeout { .. } => {
                "Increase --webhook-timeout-secs or check the webhook destination"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Check the JSON payload format",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Check command-line flags, environment variables and the .env file"
            }
            Self::RuleConflict { .. } => {
                "Make sure no source domain reappears inside a replacement domain"
            }
            Self::ValidationError { .. } => {
                r#"Send { "url": "single_url" } OR { "text": "text with multiple urls" }"#
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Upstream => format!("Could not reach the webhook: {}", self),
            ErrorCategory::Request => self.to_string(),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkFixError>;
