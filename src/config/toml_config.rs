use crate::core::ConfigProvider;
use crate::utils::error::{ReaderError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub namespaces: Option<Vec<String>>,
    pub strict_id_prefix: Option<bool>,
    pub require_nested_prod: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub ncm_base_url: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReaderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReaderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NCM_BASE_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(namespaces) = &self.document.namespaces {
            for ns in namespaces {
                validate_non_empty_string("document.namespaces", ns)?;
            }
        }

        if let Some(base) = &self.lookup.ncm_base_url {
            validate_url("lookup.ncm_base_url", base)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn namespaces(&self) -> &[String] {
        self.document.namespaces.as_deref().unwrap_or(&[])
    }

    fn strict_id_prefix(&self) -> bool {
        self.document.strict_id_prefix.unwrap_or(false)
    }

    fn require_nested_prod(&self) -> bool {
        self.document.require_nested_prod.unwrap_or(false)
    }

    fn ncm_lookup_base(&self) -> Option<&str> {
        self.lookup.ncm_base_url.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
