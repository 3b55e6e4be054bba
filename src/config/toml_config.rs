use crate::utils::error::{Result, TravelError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub document: DocumentConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: 0.7,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: None,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    /// 取得 API 金鑰：設定檔優先，其次為環境變數 GOOGLE_API_KEY
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !is_unresolved_placeholder(key))
            .map(str::to_string)
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub logo_path: Option<String>,
    pub brand: String,
    pub contact: String,
    pub closing_note: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            logo_path: Some("assets/logo.png".to_string()),
            brand: "Travel Recommendation System".to_string(),
            contact: "hello@travel-planner.example | +1 (555) 010-2025".to_string(),
            closing_note: "Prices and schedules are indicative and may change before booking. \
                           Have a wonderful trip!"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
        }
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TravelError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TravelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.llm.provider != "gemini" {
            return Err(TravelError::InvalidConfigValueError {
                field: "llm.provider".to_string(),
                value: self.llm.provider.clone(),
                reason: "Unsupported provider. Supported: gemini".to_string(),
            });
        }

        validation::validate_url("llm.base_url", &self.llm.base_url)?;
        validation::validate_range("llm.temperature", self.llm.temperature, 0.0, 2.0)?;
        validation::validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 600)?;

        if self.llm.model.trim().is_empty() {
            return Err(TravelError::InvalidConfigValueError {
                field: "llm.model".to_string(),
                value: self.llm.model.clone(),
                reason: "Model name cannot be empty".to_string(),
            });
        }

        if let Some(logo) = &self.document.logo_path {
            validation::validate_path("document.logo_path", logo)?;
        }
        validation::validate_path("output.path", &self.output.path)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
