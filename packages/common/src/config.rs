use std::path::PathBuf;

use serde::Deserialize;

/// Which object store implementation backs complaint media.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Object store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Largest object accepted by the store, in bytes. Default: 16 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    /// Required when `backend = "s3"`.
    pub s3: Option<S3Config>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemConfig {
    /// Directory objects are written to. Default: "./data/objects".
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// URL prefix the objects are served under. Default: "/media".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub bucket: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Public URL prefix for stored objects. Defaults to `{endpoint}/{bucket}`.
    pub public_base_url: Option<String>,
}

fn default_max_object_size() -> u64 {
    16 * 1024 * 1024
}
fn default_base_path() -> PathBuf {
    PathBuf::from("./data/objects")
}
fn default_public_base_url() -> String {
    "/media".into()
}
fn default_s3_region() -> String {
    "us-east-1".into()
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_object_size: default_max_object_size(),
            filesystem: FilesystemConfig::default(),
            s3: None,
        }
    }
}
