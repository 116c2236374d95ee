use crate::utils::error::{LinkFixError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LinkFixError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 規則中的網域只能是裸網域，例如 `twitter.com`，不得帶 scheme 或路徑
pub fn validate_domain(field_name: &str, domain: &str) -> Result<()> {
    validate_non_empty_string(field_name, domain)?;

    if domain.contains("://") {
        return Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: domain.to_string(),
            reason: "Domain must not include a scheme".to_string(),
        });
    }

    if domain.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: domain.to_string(),
            reason: "Domain must not contain whitespace or '/'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LinkFixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
