use crate::core::xml::DEFAULT_NAMESPACES;
use serde::{Deserialize, Serialize};

/// 欄位不存在時顯示的標記
pub const ABSENT: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub code: String,
    pub description: String,
    pub ncm: String,
    pub cfop: String,
}

impl ProductEntry {
    pub fn is_absent(value: &str) -> bool {
        value == ABSENT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatus {
    pub key: String,
    pub valid: bool,
}

impl KeyStatus {
    pub fn of(key: &str) -> Self {
        Self {
            key: key.to_string(),
            valid: crate::core::key::is_valid(key),
        }
    }
}

/// How strictly documents are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Tried in order before falling back to local-name matching.
    pub namespaces: Vec<String>,
    /// Reject an `Id` attribute that does not start with `NFe`.
    pub strict_id_prefix: bool,
    /// Require a nested `prod` element inside each `det`.
    pub require_nested_prod: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            strict_id_prefix: false,
            require_nested_prod: false,
        }
    }
}

impl DocumentOptions {
    pub fn from_provider<C: crate::domain::ports::ConfigProvider + ?Sized>(config: &C) -> Self {
        let namespaces = if config.namespaces().is_empty() {
            Self::default().namespaces
        } else {
            config.namespaces().to_vec()
        };

        Self {
            namespaces,
            strict_id_prefix: config.strict_id_prefix(),
            require_nested_prod: config.require_nested_prod(),
        }
    }
}
