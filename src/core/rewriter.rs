use crate::utils::error::{LinkFixError, Result};
use crate::utils::validation::validate_domain;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::ser::{Serialize, Serializer};

const SCHEME: &str = "https://";

/// 預設規則，順序即套用順序
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("twitter.com", "vxtwitter.com"),
    ("x.com", "vxtwitter.com"),
    ("reddit.com", "vxreddit.com"),
];

#[derive(Debug, Clone)]
pub struct RewriteRule {
    source: String,
    target: String,
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let target = target.into();
        validate_domain("rules.source", &source)?;
        validate_domain("rules.target", &target)?;

        // 純文字比對，只認 https:// 前綴，不做 URL 解析
        let pattern = RegexBuilder::new(&regex::escape(&format!("{SCHEME}{source}")))
            .case_insensitive(true)
            .build()
            .map_err(|e| LinkFixError::config(format!("Invalid rule pattern for {source}: {e}")))?;
        let replacement = format!("{SCHEME}{target}");

        Ok(Self {
            source,
            target,
            pattern,
            replacement,
        })
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }

    fn needle(&self) -> String {
        format!("{SCHEME}{}", self.source).to_lowercase()
    }
}

/// Ordered, immutable set of rewrite rules shared by every request.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    /// Rejects empty sets, duplicate sources, and any source that would match inside a replacement
    /// or could be completed by the text following one.
    pub fn new(rules: Vec<RewriteRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(LinkFixError::config("Rule set must contain at least one rule"));
        }

        for (i, rule) in rules.iter().enumerate() {
            let needle = rule.needle();

            if let Some(dup) = rules[..i].iter().find(|r| r.needle() == needle) {
                return Err(LinkFixError::RuleConflict {
                    message: format!("Duplicate source domain: {}", dup.source),
                });
            }

            // 取代後的結果不能再被任何規則命中：
            // 不能包含 needle，也不能是 needle 的前綴 (後面的文字可能把它補齊)
            if let Some(other) = rules.iter().find(|r| {
                let replacement = r.replacement.to_lowercase();
                replacement.contains(&needle) || needle.starts_with(&replacement)
            }) {
                return Err(LinkFixError::RuleConflict {
                    message: format!(
                        "Source '{}' would re-match the replacement '{}' of rule '{}'",
                        rule.source, other.target, other.source
                    ),
                });
            }
        }

        Ok(Self { rules })
    }

    pub fn from_pairs<S, T>(pairs: impl IntoIterator<Item = (S, T)>) -> Result<Self>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(source, target)| RewriteRule::new(source, target))
            .collect::<Result<Vec<_>>>()?;
        Self::new(rules)
    }

    /// 支援的來源網域，依規則順序
    pub fn platforms(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.source.clone()).collect()
    }

    pub fn fix_links(&self, input: &str) -> String {
        // 每條規則都要套用，不能在第一個命中就停
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(source, target)| RewriteRule::new(*source, *target).ok())
            .collect();
        Self { rules }
    }
}

/// 序列化成 `{ source: target }`，保留規則順序
impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.rules.iter().map(|r| (&r.source, &r.target)))
    }
}
