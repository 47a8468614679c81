#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{BoundaryPolicy, StatusPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use self::toml_config::{TomlConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECONDS};

#[cfg(feature = "cli")]
pub use self::cli::{AdminCommand, CliConfig, Command};

/// Effective settings after merging the config file with command line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalConfig {
    pub api_base: String,
    pub timeout_seconds: u64,
    pub boundary: BoundaryPolicy,
    pub status_policy: StatusPolicy,
    pub log_json: bool,
    pub log_level: Option<String>,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            boundary: BoundaryPolicy::default(),
            status_policy: StatusPolicy::default(),
            log_json: false,
            log_level: None,
        }
    }
}

impl RentalConfig {
    pub fn from_toml(file: &TomlConfig) -> Result<Self> {
        file.validate()?;
        Ok(Self {
            api_base: file.api_base().to_string(),
            timeout_seconds: file.timeout_seconds(),
            boundary: file.boundary_policy(),
            status_policy: file.status_policy(),
            log_json: file.log_json(),
            log_level: file.log_level().map(|level| level.trim().to_ascii_lowercase()),
        })
    }
}

impl ConfigProvider for RentalConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary
    }

    fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }
}

impl Validate for RentalConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RentalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base(), "http://localhost:5000");
    }

    #[test]
    fn test_from_toml_rejects_invalid_file() {
        let file = TomlConfig::from_toml_str("[availability]\nboundary = \"sometimes\"").unwrap();
        assert!(RentalConfig::from_toml(&file).is_err());
    }

    #[test]
    fn test_from_toml_carries_policies() {
        let file = TomlConfig::from_toml_str(
            "[availability]\nboundary = \"same_day_turnover\"\n[logging]\njson = true",
        )
        .unwrap();
        let config = RentalConfig::from_toml(&file).unwrap();
        assert_eq!(config.boundary, BoundaryPolicy::SameDayTurnover);
        assert!(config.log_json);
        assert_eq!(config.log_level, None);
    }
}
