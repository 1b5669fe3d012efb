pub mod document;
pub mod key;
pub mod locator;
pub mod ncm_link;
pub mod registry;
pub mod xml;

pub use crate::domain::model::{DocumentOptions, KeyStatus, ProductEntry, ABSENT};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
