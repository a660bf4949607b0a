use crate::config::Settings;
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub state_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    pub featured_limit: Option<usize>,
    pub currency_symbol: Option<String>,
    pub notification_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StorefrontError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StorefrontError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STOREFRONT_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StorefrontError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用到預設值上，得到最終設定
    pub fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            base_url: self.server.base_url.unwrap_or(defaults.base_url),
            timeout_seconds: self
                .server
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            state_dir: self.storage.state_dir.unwrap_or(defaults.state_dir),
            featured_limit: self.ui.featured_limit.unwrap_or(defaults.featured_limit),
            currency_symbol: self.ui.currency_symbol.unwrap_or(defaults.currency_symbol),
            notification_ms: self.ui.notification_ms.unwrap_or(defaults.notification_ms),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
base_url = "https://shop.example.com"
timeout_seconds = 20

[storage]
state_dir = "/tmp/storefront"

[ui]
featured_limit = 4
currency_symbol = "$"
notification_ms = 2000
"#;

        let settings = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();

        assert_eq!(settings.base_url, "https://shop.example.com");
        assert_eq!(settings.timeout_seconds, 20);
        assert_eq!(settings.state_dir, "/tmp/storefront");
        assert_eq!(settings.featured_limit, 4);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.notification_ms, 2000);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings = TomlConfig::from_toml_str("").unwrap().into_settings();
        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.featured_limit, 8);
        assert_eq!(settings.currency_symbol, "₹");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STOREFRONT_TEST_URL", "https://test.shop.com");

        let toml_content = r#"
[server]
base_url = "${STOREFRONT_TEST_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("https://test.shop.com")
        );

        std::env::remove_var("STOREFRONT_TEST_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[server]
base_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[server\nbase_url = 1").unwrap_err();
        assert!(matches!(err, StorefrontError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[ui]\nfeatured_limit = 12\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.ui.featured_limit, Some(12));
    }
}
