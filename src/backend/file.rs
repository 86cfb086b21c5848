//! File-based storage backend (durable, one JSON file per key).
//!
//! The durable analog of a browser's local storage: each key maps to one
//! file under a root directory, written whole on every save. Suitable for
//! a single local client; there is no locking across processes.

use super::StorageBackend;
use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable storage backend writing each key to its own file.
///
/// Keys are sanitized into file names (`:` becomes `_`, with a `.json`
/// suffix), so `billkit:public:products` lands in
/// `billkit_public_products.json` under the root directory.
///
/// # Example
///
/// ```no_run
/// use bill_kit::backend::{FileBackend, StorageBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = FileBackend::open("./data").await?;
///     backend.set("key1", b"[]".to_vec()).await?;
///     assert!(backend.exists("key1").await?);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct FileBackend {
    root: Arc<PathBuf>,
}

impl FileBackend {
    /// Open a file backend rooted at `root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    /// Returns `Err` if the directory cannot be created.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        debug!("FileBackend opened at {}", root.display());
        Ok(FileBackend {
            root: Arc::new(root),
        })
    }

    /// The directory this backend stores its files in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name = format!("{}.json", key.replace(':', "_"));
        self.root.join(file_name)
    }
}

impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => {
                debug!("File GET {} -> HIT ({} bytes)", key, bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File GET {} -> MISS", key);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        debug!("File SET {} ({} bytes)", key, value.len());
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => {
                debug!("File DELETE {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(key)).await?)
    }

    async fn health_check(&self) -> Result<bool> {
        let meta = tokio::fs::metadata(self.root.as_path()).await?;
        Ok(meta.is_dir())
    }

    async fn clear_all(&self) -> Result<()> {
        let mut entries = tokio::fs::read_dir(self.root.as_path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                tokio::fs::remove_file(&path).await?;
            }
        }
        warn!(
            "File CLEAR_ALL executed under {} - all stored data cleared!",
            self.root.display()
        );
        Ok(())
    }
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("root", &self.root)
            .finish()
    }
}
