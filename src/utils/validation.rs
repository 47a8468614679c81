use crate::utils::error::{RentalError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RentalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RentalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RentalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RentalError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
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
        return Err(RentalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(RentalError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Valid values: {}", allowed.join(", ")),
    })
}

/// 只檢查形狀，真正的帳號驗證由後端負責
pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(RentalError::ValidationError {
            message: format!("{} must be an email address, got '{}'", field_name, email),
        }),
    }
}

pub fn validate_positive_price(field_name: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RentalError::ValidationError {
            message: format!("{} must be a positive amount, got {}", field_name, price),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("server.base_url", "https://example.com").is_ok());
        assert!(validate_url("server.base_url", "http://localhost:5000").is_ok());
        assert!(validate_url("server.base_url", "").is_err());
        assert!(validate_url("server.base_url", "invalid-url").is_err());
        assert!(validate_url("server.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 10u64, 1, 300).is_ok());
        assert!(validate_range("timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_range("timeout_seconds", 301u64, 1, 300).is_err());
    }

    #[test]
    fn test_validate_email_and_price() {
        assert!(validate_email("email", "jane@example.com").is_ok());
        assert!(validate_email("email", "jane").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_positive_price("price_per_day", 49.5).is_ok());
        assert!(validate_positive_price("price_per_day", 0.0).is_err());
        assert!(validate_positive_price("price_per_day", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("boundary", "inclusive", &["inclusive", "same_day_turnover"]).is_ok());
        assert!(validate_one_of("boundary", "strict", &["inclusive", "same_day_turnover"]).is_err());
    }
}
