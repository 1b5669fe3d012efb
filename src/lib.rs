pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{
    loader::{DocumentLoader, FileReport},
    session::{LoadOutcome, Session},
};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    document::FiscalDocument, key::is_valid, locator::ProductLocator, ncm_link::ncm_lookup_url,
    registry::DocumentRegistry,
};
pub use domain::model::{DocumentOptions, KeyStatus, ProductEntry, ABSENT};
pub use utils::error::{LookupError, ParseError, ReaderError, Result};
