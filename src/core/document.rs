use crate::core::xml::{lookup_first, XmlDocument};
use crate::domain::model::{DocumentOptions, KeyStatus};
use crate::utils::error::ParseError;

pub const ROOT_TAG: &str = "infNFe";
pub const ID_ATTRIBUTE: &str = "Id";
pub const ID_PREFIX: &str = "NFe";

const BOM: char = '\u{FEFF}';

/// One parsed NFe/NFC-e file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiscalDocument {
    name: String,
    tree: XmlDocument,
    access_key: String,
}

impl FiscalDocument {
    /// 解析 XML 文字並取出 access key
    pub fn parse(
        raw_text: &str,
        source_name: &str,
        options: &DocumentOptions,
    ) -> Result<Self, ParseError> {
        let text = raw_text.strip_prefix(BOM).unwrap_or(raw_text).trim();

        let tree = XmlDocument::parse(text)?;

        let root = lookup_first(&tree, ROOT_TAG, options.namespaces.as_slice())
            .ok_or(ParseError::MissingRoot)?;

        let id = root.attribute(ID_ATTRIBUTE).unwrap_or("");
        let access_key = match id.strip_prefix(ID_PREFIX) {
            Some(stripped) => stripped.to_string(),
            None if options.strict_id_prefix => {
                return Err(ParseError::InvalidIdPrefix(id.to_string()));
            }
            None => id.to_string(),
        };

        if access_key.is_empty() {
            return Err(ParseError::MissingKey);
        }

        tracing::debug!("Parsed {} with access key {}", source_name, access_key);

        Ok(Self {
            name: source_name.to_string(),
            tree,
            access_key,
        })
    }

    /// Decodes bytes as UTF-8, replacing invalid sequences, then parses.
    pub fn from_bytes(
        bytes: &[u8],
        source_name: &str,
        options: &DocumentOptions,
    ) -> Result<Self, ParseError> {
        Self::parse(&String::from_utf8_lossy(bytes), source_name, options)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn key_status(&self) -> KeyStatus {
        KeyStatus::of(&self.access_key)
    }

    pub fn tree(&self) -> &XmlDocument {
        &self.tree
    }
}
