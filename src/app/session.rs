use crate::core::document::FiscalDocument;
use crate::core::locator::ProductLocator;
use crate::core::registry::DocumentRegistry;
use crate::domain::model::{DocumentOptions, KeyStatus, ProductEntry};
use crate::utils::error::{ReaderError, Result};
use crate::utils::validation::parse_ordinal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(KeyStatus),
    /// Same name was already registered; the existing document became active.
    AlreadyLoaded(KeyStatus),
}

impl LoadOutcome {
    pub fn key_status(&self) -> &KeyStatus {
        match self {
            LoadOutcome::Loaded(status) | LoadOutcome::AlreadyLoaded(status) => status,
        }
    }
}

/// Caller-held state: the registry plus the currently selected document.
#[derive(Debug, Default)]
pub struct Session {
    registry: DocumentRegistry,
    locator: ProductLocator,
    active: Option<String>,
}

impl Session {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            registry: DocumentRegistry::new(),
            locator: ProductLocator::new(options),
            active: None,
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        self.locator.options()
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// 解析 → 註冊 → 設為目前文件
    ///
    /// A document that fails to parse leaves the registry and the active
    /// selection untouched.
    pub fn admit(&mut self, bytes: &[u8], name: &str) -> Result<LoadOutcome> {
        let doc = FiscalDocument::from_bytes(bytes, name, self.options())
            .map_err(|e| ReaderError::parse(name, e))?;

        let admitted = self.registry.add(doc);
        self.active = Some(name.to_string());

        let status = self.active_key_status().ok_or_else(|| ReaderError::UnknownDocument {
            name: name.to_string(),
        })?;

        Ok(if admitted {
            LoadOutcome::Loaded(status)
        } else {
            LoadOutcome::AlreadyLoaded(status)
        })
    }

    pub fn select(&mut self, name: &str) -> Result<KeyStatus> {
        let doc = self
            .registry
            .get(name)
            .ok_or_else(|| ReaderError::UnknownDocument {
                name: name.to_string(),
            })?;
        let status = doc.key_status();
        self.active = Some(name.to_string());
        Ok(status)
    }

    pub fn active(&self) -> Option<&FiscalDocument> {
        self.active.as_deref().and_then(|name| self.registry.get(name))
    }

    pub fn active_key_status(&self) -> Option<KeyStatus> {
        self.active().map(FiscalDocument::key_status)
    }

    pub fn active_item_count(&self) -> Option<usize> {
        self.active().map(|doc| self.locator.item_count(doc))
    }

    /// Looks up a product in the active document from raw ordinal input.
    pub fn find_product(&self, ordinal_input: &str) -> Result<ProductEntry> {
        let ordinal = parse_ordinal(ordinal_input)?;
        let doc = self.active().ok_or(ReaderError::NoActiveDocument)?;
        Ok(self.locator.find_product(doc, ordinal)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LookupError;

    fn xml(key: &str, code: &str) -> Vec<u8> {
        format!(
            r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe Id="NFe{}"><det nItem="1"><prod><cProd>{}</cProd></prod></det></infNFe></NFe></nfeProc>"#,
            key, code
        )
        .into_bytes()
    }

    #[test]
    fn test_admit_activates_document() {
        let mut session = Session::default();
        let outcome = session.admit(&xml("123", "A"), "a.xml").unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(KeyStatus::of("123")));
        assert_eq!(session.active().unwrap().name(), "a.xml");
        assert_eq!(session.find_product("1").unwrap().code, "A");
    }

    #[test]
    fn test_duplicate_admit_keeps_first_document() {
        let mut session = Session::default();
        session.admit(&xml("111", "A"), "a.xml").unwrap();
        session.admit(&xml("222", "B"), "b.xml").unwrap();

        let outcome = session.admit(&xml("333", "C"), "a.xml").unwrap();
        assert_eq!(outcome, LoadOutcome::AlreadyLoaded(KeyStatus::of("111")));
        assert_eq!(session.registry().len(), 2);
        assert_eq!(session.find_product("1").unwrap().code, "A");
    }

    #[test]
    fn test_rejected_file_leaves_state_untouched() {
        let mut session = Session::default();
        session.admit(&xml("111", "A"), "a.xml").unwrap();

        let err = session.admit(b"<not-closed>", "bad.xml").unwrap_err();
        assert!(matches!(err, ReaderError::Parse { .. }));
        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.active().unwrap().name(), "a.xml");
    }

    #[test]
    fn test_select_and_lookup() {
        let mut session = Session::default();
        session.admit(&xml("111", "A"), "a.xml").unwrap();
        session.admit(&xml("222", "B"), "b.xml").unwrap();

        assert_eq!(session.select("a.xml").unwrap().key, "111");
        assert_eq!(session.find_product(" 1 ").unwrap().code, "A");
        assert_eq!(session.active_item_count(), Some(1));

        assert!(matches!(
            session.select("c.xml"),
            Err(ReaderError::UnknownDocument { .. })
        ));
        assert_eq!(session.active().unwrap().name(), "a.xml");
    }

    #[test]
    fn test_lookup_errors() {
        let mut session = Session::default();
        assert!(matches!(
            session.find_product("1"),
            Err(ReaderError::NoActiveDocument)
        ));

        session.admit(&xml("111", "A"), "a.xml").unwrap();
        assert!(matches!(
            session.find_product("abc"),
            Err(ReaderError::InvalidOrdinal { .. })
        ));
        assert!(matches!(
            session.find_product("2"),
            Err(ReaderError::Lookup(LookupError::NotFound { .. }))
        ));
        assert!(matches!(
            session.find_product("0"),
            Err(ReaderError::Lookup(LookupError::NotFound { .. }))
        ));
        assert!(matches!(
            session.find_product("99999999999999999999"),
            Err(ReaderError::Lookup(LookupError::NotFound {
                ordinal: i64::MAX,
                available: 1
            }))
        ));
    }
}
