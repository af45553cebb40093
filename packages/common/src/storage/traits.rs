use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;

/// Location of an object after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// URL clients use to fetch the object.
    pub url: String,
    /// Opaque key, only meaningful to the store that issued it.
    pub object_id: String,
}

/// Binary object storage reached outside of the database transaction.
///
/// Implementations must never reuse an object id across uploads, so every
/// object has exactly one owner.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a freshly generated object id.
    async fn upload(&self, data: &[u8], file_name: &str) -> Result<StoredObject, StorageError>;

    /// Delete an object by id.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, object_id: &str) -> Result<bool, StorageError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn upload(&self, data: &[u8], file_name: &str) -> Result<StoredObject, StorageError> {
        (**self).upload(data, file_name).await
    }

    async fn delete(&self, object_id: &str) -> Result<bool, StorageError> {
        (**self).delete(object_id).await
    }
}
