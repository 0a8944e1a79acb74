use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};

use super::ingestion_config::IngestionConfig;
use crate::errors::{IngestionError, Result};

/// Lifecycle of the temporary uploaded file.
#[async_trait]
pub trait SourceFileStoreTrait: Send + Sync {
    /// Moves `source` to its canonical location, replacing an existing file of the same name.
    async fn promote(&self, source: &Path, canonical_name: &str) -> Result<PathBuf>;

    /// Deletes `source`. A file that is already gone is not an error.
    async fn discard(&self, source: &Path) -> Result<()>;
}

pub struct LocalSourceFileStore {
    uploads_dir: PathBuf,
    keep_extension: bool,
}

impl LocalSourceFileStore {
    pub fn new(uploads_dir: impl Into<PathBuf>, keep_extension: bool) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            keep_extension,
        }
    }

    pub fn from_config(config: &IngestionConfig) -> Self {
        Self::new(config.uploads_dir.clone(), config.canonical_extension)
    }

    fn target_path(&self, source: &Path, canonical_name: &str) -> PathBuf {
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .filter(|_| self.keep_extension);
        match extension {
            Some(ext) => self.uploads_dir.join(format!("{}.{}", canonical_name, ext)),
            None => self.uploads_dir.join(canonical_name),
        }
    }
}

fn file_store_error(action: &str, path: &Path, err: std::io::Error) -> IngestionError {
    IngestionError::FileStore(format!("{} {}: {}", action, path.display(), err))
}

#[async_trait]
impl SourceFileStoreTrait for LocalSourceFileStore {
    async fn promote(&self, source: &Path, canonical_name: &str) -> Result<PathBuf> {
        let target = self.target_path(source, canonical_name);

        if let Err(e) = tokio::fs::metadata(source).await {
            let reason = format!("{}: {}", source.display(), e);
            return Err(IngestionError::SourceUnavailable(reason).into());
        }

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| file_store_error("create", &self.uploads_dir, e))?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => warn!("Replacing existing file {}", target.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(file_store_error("replace", &target, e).into()),
        }

        if tokio::fs::rename(source, &target).await.is_err() {
            // Rename fails across filesystems.
            tokio::fs::copy(source, &target)
                .await
                .map_err(|e| file_store_error("copy", source, e))?;
            tokio::fs::remove_file(source)
                .await
                .map_err(|e| file_store_error("remove", source, e))?;
        }

        debug!("Promoted {} to {}", source.display(), target.display());
        Ok(target)
    }

    async fn discard(&self, source: &Path) -> Result<()> {
        match tokio::fs::remove_file(source).await {
            Ok(()) => {
                debug!("Discarded {}", source.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(file_store_error("remove", source, e).into()),
        }
    }
}
