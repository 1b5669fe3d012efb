use crate::app::session::{LoadOutcome, Session};
use crate::domain::ports::Storage;
use crate::utils::error::{ReaderError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::task::{self, JoinSet};

/// Result of loading one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: String,
    pub name: String,
    pub outcome: Result<LoadOutcome>,
}

/// Reads files concurrently and feeds each completion into a [`Session`].
pub struct DocumentLoader<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> DocumentLoader<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// 每個檔案獨立讀取，完成順序不保證
    ///
    /// Reads run concurrently, but each completion is parsed, registered and
    /// activated in full before the next one is looked at, so the session is
    /// only ever touched from this task. Reports come back in completion order.
    pub async fn load_all(&self, session: &mut Session, paths: &[String]) -> Vec<FileReport> {
        let mut reads = JoinSet::new();
        let mut task_paths: HashMap<task::Id, String> = HashMap::with_capacity(paths.len());
        for path in paths {
            let storage = Arc::clone(&self.storage);
            let task_path = path.clone();
            let handle = reads.spawn(async move {
                let bytes = storage.read_file(&task_path).await;
                (task_path, bytes)
            });
            task_paths.insert(handle.id(), path.clone());
        }

        let mut reports = Vec::with_capacity(paths.len());
        while let Some(joined) = reads.join_next_with_id().await {
            let (path, bytes) = match joined {
                Ok((_, done)) => done,
                Err(e) => {
                    // 讀取 task panic 時仍回報是哪個檔案
                    let path = task_paths.remove(&e.id()).unwrap_or_default();
                    tracing::error!("File read task for {} failed: {}", path, e);
                    reports.push(FileReport {
                        name: display_name(&path),
                        path,
                        outcome: Err(ReaderError::TaskError {
                            message: e.to_string(),
                        }),
                    });
                    continue;
                }
            };

            let name = display_name(&path);
            let outcome = bytes.and_then(|bytes| session.admit(&bytes, &name));
            match &outcome {
                Ok(LoadOutcome::Loaded(status)) => {
                    tracing::info!("📄 Loaded {} (key {}, valid: {})", name, status.key, status.valid)
                }
                Ok(LoadOutcome::AlreadyLoaded(_)) => {
                    tracing::warn!("Skipped {}: a document with this name is already loaded", name)
                }
                Err(e) => tracing::warn!("❌ Rejected {}: {}", path, e),
            }

            reports.push(FileReport {
                path,
                name,
                outcome,
            });
        }

        reports
    }

    pub async fn load_one(&self, session: &mut Session, path: &str) -> Result<LoadOutcome> {
        let bytes = self.storage.read_file(path).await?;
        session.admit(&bytes, &display_name(path))
    }
}

/// File name without directories; documents are keyed by it.
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}
