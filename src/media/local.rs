//! Local-disk image storage.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{decode_data_uri, extension_for, ImageStore, StoredImage};
use crate::{NetlinkError, Result};

/// Image store writing files under a base directory.
///
/// Files are sharded by the first 2 characters of their UUID name:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.png
/// └── ...
/// ```
/// The public URL mirrors that layout under `public_base_url`, so the base
/// directory can be served as-is.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl LocalImageStore {
    /// Create a store, creating the base directory if needed.
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        max_size_mb: u64,
    ) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size: (max_size_mb as usize) * 1024 * 1024,
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full file path for a storage ID.
    ///
    /// Rejects IDs that could escape the base directory.
    pub fn file_path(&self, id: &str) -> Result<PathBuf> {
        if id.len() < 2
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            || id.contains("..")
        {
            return Err(NetlinkError::Storage(format!("invalid image id: {id}")));
        }
        Ok(self.base_path.join(&id[..2]).join(id))
    }

    fn public_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, &id[..2], id)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, data_uri: &str) -> Result<StoredImage> {
        let image = decode_data_uri(data_uri)?;

        if image.bytes.len() > self.max_size {
            return Err(NetlinkError::Validation(format!(
                "image exceeds {} MB",
                self.max_size / (1024 * 1024)
            )));
        }

        let ext = extension_for(&image.mime).ok_or_else(|| {
            NetlinkError::Validation(format!("unsupported image type: {}", image.mime))
        })?;
        let id = format!("{}.{ext}", Uuid::new_v4());
        let path = self.file_path(&id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| NetlinkError::Storage(format!("failed to write {id}: {e}")))?;

        debug!("Stored image {} ({} bytes)", id, image.bytes.len());

        Ok(StoredImage {
            url: self.public_url(&id),
            id,
        })
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.file_path(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted image {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(NetlinkError::Storage(format!("failed to delete {id}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, LocalImageStore) {
        let temp_dir = TempDir::new().unwrap();
        let store =
            LocalImageStore::new(temp_dir.path(), "http://localhost:5000/images/", 1).unwrap();
        (temp_dir, store)
    }

    fn png_uri(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("images");

        let store = LocalImageStore::new(&path, "http://localhost/images", 1).unwrap();

        assert!(path.exists());
        assert_eq!(store.base_path(), path);
    }

    #[tokio::test]
    async fn test_upload_writes_sharded_file() {
        let (_temp_dir, store) = setup_store();

        let image = store.upload(&png_uri(b"pixels")).await.unwrap();

        assert!(image.id.ends_with(".png"));
        assert_eq!(
            image.url,
            format!("http://localhost:5000/images/{}/{}", &image.id[..2], image.id)
        );
        let path = store.file_path(&image.id).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let (_temp_dir, store) = setup_store();
        let big = vec![0u8; 1024 * 1024 + 1];

        let result = store.upload(&png_uri(&big)).await;
        assert!(matches!(result, Err(NetlinkError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_temp_dir, store) = setup_store();
        let image = store.upload(&png_uri(b"pixels")).await.unwrap();

        assert!(store.delete(&image.id).await.unwrap());
        assert!(!store.file_path(&image.id).unwrap().exists());
        // Second delete is a no-op
        assert!(!store.delete(&image.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let (_temp_dir, store) = setup_store();

        let result = store.delete("../../etc/passwd").await;
        assert!(matches!(result, Err(NetlinkError::Storage(_))));
    }
}
