use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::key::{new_object_id, validate_object_id};
use super::traits::{ObjectStore, StoredObject};
use crate::config::S3Config;

/// Object store backed by an S3-compatible service.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config, max_size: u64) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Remote(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Remote(format!("invalid credentials: {e}")))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Remote(e.to_string()))?
            .with_path_style();

        let public_base_url = match (&config.public_base_url, &config.endpoint) {
            (Some(url), _) => url.clone(),
            (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
            (None, None) => format!(
                "https://{}.s3.{}.amazonaws.com",
                config.bucket, config.region
            ),
        };

        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, data: &[u8], file_name: &str) -> Result<StoredObject, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let object_id = new_object_id(file_name);
        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();

        let response = self
            .bucket
            .put_object_with_content_type(&object_id, data, &content_type)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(StorageError::Remote(format!(
                "PUT {object_id} returned HTTP {status}"
            )));
        }

        debug!(object_id, size = data.len(), "Uploaded object");
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, object_id),
            object_id,
        })
    }

    /// Reports `false` on a 404. Most S3 services answer 204 for a missing key,
    /// so `true` does not prove the object existed.
    async fn delete(&self, object_id: &str) -> Result<bool, StorageError> {
        validate_object_id(object_id)?;

        let response = self
            .bucket
            .delete_object(object_id)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        let status = response.status_code();
        match status {
            404 => Ok(false),
            s if is_success(s) => Ok(true),
            s => Err(StorageError::Remote(format!(
                "DELETE {object_id} returned HTTP {s}"
            ))),
        }
    }
}
