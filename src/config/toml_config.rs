use crate::core::ConfigProvider;
use crate::domain::model::{BoundaryPolicy, StatusPolicy};
use crate::utils::error::{RentalError, Result};
use crate::utils::validation::{validate_one_of, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// "inclusive" | "same_day_turnover"
    pub boundary: Option<String>,
    /// "active_only" | "all_reservations"
    pub status_policy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RentalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RentalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RENTAL_API_BASE})，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| RentalError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("server.base_url", &self.server.base_url)?;

        if let Some(timeout) = self.server.timeout_seconds {
            validate_range("server.timeout_seconds", timeout, 1, 300)?;
        }
        // 與 FromStr 相同的大小寫規則
        if let Some(boundary) = &self.availability.boundary {
            boundary.parse::<BoundaryPolicy>()?;
        }
        if let Some(policy) = &self.availability.status_policy {
            policy.parse::<StatusPolicy>()?;
        }
        if let Some(level) = self.log_level() {
            validate_one_of(
                "logging.level",
                &level.trim().to_ascii_lowercase(),
                &["trace", "debug", "info", "warn", "error"],
            )?;
        }

        Ok(())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        &self.server.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.server.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    // 未驗證的值退回預設，validate() 會先擋下
    fn boundary_policy(&self) -> BoundaryPolicy {
        self.availability
            .boundary
            .as_deref()
            .and_then(|b| b.parse().ok())
            .unwrap_or_default()
    }

    fn status_policy(&self) -> StatusPolicy {
        self.availability
            .status_policy
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
