use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::{OBJECT_PREFIX, new_object_id, validate_object_id};
use super::traits::{ObjectStore, StoredObject};

/// Filesystem-backed object store for local development.
///
/// Objects are stored at `{base_path}/complaints/{name}` and exposed as
/// `{public_base_url}/complaints/{name}`.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join(OBJECT_PREFIX)).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn object_path(&self, object_id: &str) -> Result<PathBuf, StorageError> {
        let name = validate_object_id(object_id)?;
        Ok(self.base_path.join(OBJECT_PREFIX).join(name))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn upload(&self, data: &[u8], file_name: &str) -> Result<StoredObject, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let object_id = new_object_id(file_name);
        let object_path = self.object_path(&object_id)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, object_id),
            object_id,
        })
    }

    async fn delete(&self, object_id: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(object_id)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
