use std::sync::Arc;

use common::config::{StorageBackend, StorageConfig};
use common::storage::{
    FilesystemObjectStore, InMemoryObjectStore, ObjectStore, S3ObjectStore, StorageError,
};
use tracing::info;

/// Build the object store selected by `config.backend`.
pub async fn build_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let fs = &config.filesystem;
            info!(path = %fs.base_path.display(), "Using filesystem object store");
            let store = FilesystemObjectStore::new(
                fs.base_path.clone(),
                fs.public_base_url.clone(),
                config.max_object_size,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                StorageError::Remote("storage.backend is s3 but [storage.s3] is missing".into())
            })?;
            info!(bucket = %s3.bucket, "Using S3 object store");
            Ok(Arc::new(S3ObjectStore::new(s3, config.max_object_size)?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; images are lost on restart");
            Ok(Arc::new(InMemoryObjectStore::new()))
        }
    }
}
