use crate::core::document::FiscalDocument;
use crate::core::xml::{lookup_elements, lookup_first, XmlElement};
use crate::domain::model::{DocumentOptions, ProductEntry, ABSENT};
use crate::utils::error::LookupError;

pub const ITEM_TAG: &str = "det";
pub const PRODUCT_TAG: &str = "prod";

/// Finds line items in a document and reads their product fields.
#[derive(Debug, Clone, Default)]
pub struct ProductLocator {
    options: DocumentOptions,
}

impl ProductLocator {
    pub fn new(options: DocumentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    fn items<'a>(&self, doc: &'a FiscalDocument) -> Vec<&'a XmlElement> {
        lookup_elements(doc.tree(), ITEM_TAG, self.options.namespaces.as_slice())
    }

    pub fn item_count(&self, doc: &FiscalDocument) -> usize {
        self.items(doc).len()
    }

    /// 依 1 起算的序號取出商品
    pub fn find_product(
        &self,
        doc: &FiscalDocument,
        ordinal: i64,
    ) -> Result<ProductEntry, LookupError> {
        let items = self.items(doc);
        let not_found = || LookupError::NotFound {
            ordinal,
            available: items.len(),
        };

        let index = ordinal
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(not_found)?;
        let item = *items.get(index).ok_or_else(not_found)?;

        let nested = lookup_first(item, PRODUCT_TAG, self.options.namespaces.as_slice());
        let container = match nested {
            Some(prod) => prod,
            None if self.options.require_nested_prod => {
                return Err(LookupError::MissingContainer { ordinal });
            }
            None => {
                tracing::debug!("Item {} has no <prod>, reading fields from <det>", ordinal);
                item
            }
        };

        Ok(ProductEntry {
            code: self.field(container, "cProd"),
            description: self.field(container, "xProd"),
            ncm: self.field(container, "NCM"),
            cfop: self.field(container, "CFOP"),
        })
    }

    fn field(&self, container: &XmlElement, tag: &str) -> String {
        lookup_first(container, tag, self.options.namespaces.as_slice())
            .map(|e| e.text_content().trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| ABSENT.to_string())
    }
}
