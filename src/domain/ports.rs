use crate::utils::error::Result;

/// Source of raw document bytes.
pub trait Storage: Send + Sync + 'static {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn namespaces(&self) -> &[String];
    fn strict_id_prefix(&self) -> bool;
    fn require_nested_prod(&self) -> bool;
    fn ncm_lookup_base(&self) -> Option<&str>;
}
