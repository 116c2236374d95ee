use crate::core::rewriter::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_USERNAME: &str = "Link Fixer";

pub const USAGE_HINT: &str =
    r#"Send { "url": "single_url" } OR { "text": "text with multiple urls" }"#;

/// `POST /linkfix` 的請求內容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl FixRequest {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Content to rewrite. `url` takes precedence over `text`; empty strings count as absent.
    pub fn content(&self) -> Option<&str> {
        provided(&self.url).or_else(|| provided(&self.text))
    }

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        provided(&self.username).unwrap_or(fallback)
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResponse {
    pub success: bool,
    pub original: String,
    pub fixed: String,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub error: String,
    pub usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerErrorBody {
    pub error: String,
}

/// Discord webhook 的訊息格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub content: String,
    pub username: String,
}

/// `GET /` 回傳的服務資訊
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo<'a> {
    pub status: &'static str,
    pub message: &'static str,
    /// 依規則順序輸出 source -> target
    pub supported_platforms: &'a RuleSet,
    pub endpoints: BTreeMap<&'static str, EndpointDoc>,
}

impl<'a> ServiceInfo<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            status: "OK",
            message: "Multi-Platform Link Fixer is running",
            supported_platforms: rules,
            endpoints: BTreeMap::from([("/linkfix", EndpointDoc::linkfix())]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub parameters: LinkFixParameters,
    pub examples: LinkFixExamples,
}

/// 欄位順序即輸出順序
#[derive(Debug, Clone, Serialize)]
pub struct LinkFixParameters {
    pub url: &'static str,
    pub text: &'static str,
    pub username: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkFixExamples {
    pub single_url: &'static str,
    pub multiple_urls: &'static str,
}

impl EndpointDoc {
    pub fn linkfix() -> Self {
        Self {
            method: "POST",
            parameters: LinkFixParameters {
                url: "Single URL to fix",
                text: "Text containing multiple URLs to fix",
                username: "Custom Discord username (optional)",
            },
            examples: LinkFixExamples {
                single_url: r#"{ "url": "https://twitter.com/user/status/123" }"#,
                multiple_urls: concat!(
                    r#"{ "text": "Check this https://reddit.com/r/funny "#,
                    r#"and this https://twitter.com/user/status/456" }"#
                ),
            },
        }
    }
}
