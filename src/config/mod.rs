pub mod rules_file;

use crate::core::ConfigProvider;
use crate::core::rewriter::RuleSet;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub use rules_file::RulesFile;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "link-fixer"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Rewrites social media links to embed-friendly domains")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, env = "LINK_FIXER_HOST", default_value = "0.0.0.0"))]
    pub host: String,

    #[cfg_attr(feature = "cli", arg(long, env = "PORT", default_value = "3000"))]
    pub port: u16,

    /// Discord webhook; relay is disabled when unset
    #[cfg_attr(feature = "cli", arg(long, env = "DISCORD_WEBHOOK_URL"))]
    pub webhook_url: Option<String>,

    #[cfg_attr(
        feature = "cli",
        arg(long, env = "WEBHOOK_TIMEOUT_SECS", default_value = "10")
    )]
    pub webhook_timeout_secs: u64,

    #[cfg_attr(
        feature = "cli",
        arg(long, env = "DEFAULT_USERNAME", default_value = "Link Fixer")
    )]
    pub default_username: String,

    /// TOML file replacing the built-in rewrite rules
    #[cfg_attr(feature = "cli", arg(long, env = "RULES_FILE"))]
    pub rules_file: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON"))]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            webhook_url: None,
            webhook_timeout_secs: 10,
            default_username: crate::domain::model::DEFAULT_USERNAME.to_string(),
            rules_file: None,
            verbose: false,
            json_logs: false,
        }
    }
}

impl CliConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            crate::utils::error::LinkFixError::InvalidConfigValueError {
                field: "host".to_string(),
                value: self.host.clone(),
                reason: format!("Invalid IP address: {}", e),
            }
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl ConfigProvider for CliConfig {
    fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref().filter(|u| !u.is_empty())
    }

    fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    fn default_username(&self) -> &str {
        &self.default_username
    }

    fn rules_file(&self) -> Option<&str> {
        self.rules_file.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        // 沒設定 webhook 只代表不轉送，不算錯誤
        if let Some(url) = self.webhook_url() {
            validate_url("webhook_url", url)?;
        }

        validate_range("webhook_timeout_secs", self.webhook_timeout_secs, 1, 300)?;
        validate_non_empty_string("default_username", &self.default_username)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

/// 有指定規則檔就用檔案，否則用內建規則
pub fn load_rules<C: ConfigProvider>(config: &C) -> Result<RuleSet> {
    match config.rules_file() {
        Some(path) => {
            tracing::info!("Loading rewrite rules from {}", path);
            RulesFile::from_file(path)?.into_rule_set()
        }
        None => Ok(RuleSet::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert!(config.webhook_url().is_none());
    }

    #[test]
    fn test_empty_webhook_url_disables_relay() {
        let config = CliConfig {
            webhook_url: Some(String::new()),
            ..CliConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.webhook_url().is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_url = CliConfig {
            webhook_url: Some("not a url".to_string()),
            ..CliConfig::default()
        };
        assert!(bad_url.validate().is_err());

        let bad_timeout = CliConfig {
            webhook_timeout_secs: 0,
            ..CliConfig::default()
        };
        assert!(bad_timeout.validate().is_err());

        let bad_host = CliConfig {
            host: "localhost:3000".to_string(),
            ..CliConfig::default()
        };
        assert!(bad_host.validate().is_err());
    }

    #[test]
    fn test_load_rules_defaults_without_file() {
        let rules = load_rules(&CliConfig::default()).unwrap();
        assert_eq!(rules.platforms(), vec!["twitter.com", "x.com", "reddit.com"]);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_cli_flags() {
        let config = CliConfig::try_parse_from([
            "link-fixer",
            "--port",
            "8080",
            "--webhook-url",
            "https://discord.com/api/webhooks/1/abc",
            "--webhook-timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.webhook_timeout(), Duration::from_secs(5));
        assert_eq!(config.webhook_url(), Some("https://discord.com/api/webhooks/1/abc"));
    }
}
