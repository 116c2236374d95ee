use crate::core::rewriter::RuleSet;
use crate::utils::error::{LinkFixError, Result};
use crate::utils::validation::{validate_domain, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 規則檔格式：
///
/// ```toml
/// [[rules]]
/// source = "twitter.com"
/// target = "vxtwitter.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesFile {
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub source: String,
    pub target: String,
}

impl RulesFile {
    /// 從 TOML 檔案載入規則
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LinkFixError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析規則
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LinkFixError::InvalidConfigValueError {
            field: "rules_file".to_string(),
            value: "<toml>".to_string(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TWITTER_FIX_DOMAIN})，找不到就保留原字串
    fn substitute_env_vars(content: &str) -> String {
        use regex::{Captures, Regex};
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn into_rule_set(self) -> Result<RuleSet> {
        self.validate()?;
        RuleSet::from_pairs(self.rules.into_iter().map(|r| (r.source, r.target)))
    }
}

impl Validate for RulesFile {
    fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(LinkFixError::MissingConfigError {
                field: "rules".to_string(),
            });
        }

        for (i, rule) in self.rules.iter().enumerate() {
            validate_domain(&format!("rules[{}].source", i), &rule.source)?;
            validate_domain(&format!("rules[{}].target", i), &rule.target)?;
        }

        Ok(())
    }
}
