mod error;
mod key;
mod traits;

pub mod filesystem;
pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use key::{new_object_id, sanitize_file_name, validate_object_id};
pub use traits::{ObjectStore, StoredObject};

pub use filesystem::FilesystemObjectStore;
pub use memory::InMemoryObjectStore;
#[cfg(feature = "object-storage")]
pub use s3::S3ObjectStore;
