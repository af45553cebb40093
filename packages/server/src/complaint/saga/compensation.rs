use common::storage::ObjectStore;
use tracing::{debug, warn};

use crate::complaint::error::CompensationError;
use crate::complaint::model::UploadedImage;

/// Outcome of a best-effort cleanup pass over remote objects.
#[derive(Debug, Default)]
pub struct CompensationReport {
    pub deleted: Vec<String>,
    /// Objects the store no longer had.
    pub already_gone: Vec<String>,
    pub failures: Vec<CompensationError>,
}

impl CompensationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of delete calls made.
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.already_gone.len() + self.failures.len()
    }
}

/// Delete every object in `uploaded`, one call each, in order.
///
/// Never stops early and never retries. Failures are logged and collected.
pub async fn compensate(store: &dyn ObjectStore, uploaded: &[UploadedImage]) -> CompensationReport {
    let object_id = (|image: &UploadedImage| image.object_id.as_str()) as fn(&UploadedImage) -> &str;
    delete_objects(store, uploaded.iter().map(object_id)).await
}

pub(super) async fn delete_objects<'a>(
    store: &dyn ObjectStore,
    object_ids: impl IntoIterator<Item = &'a str>,
) -> CompensationReport {
    let mut report = CompensationReport::default();

    for object_id in object_ids {
        match store.delete(object_id).await {
            Ok(true) => {
                debug!(object_id, "Deleted object");
                report.deleted.push(object_id.to_string());
            }
            Ok(false) => {
                debug!(object_id, "Object already absent");
                report.already_gone.push(object_id.to_string());
            }
            Err(source) => {
                warn!(object_id, error = %source, "Failed to delete object, leaving it orphaned");
                report.failures.push(CompensationError {
                    object_id: object_id.to_string(),
                    source,
                });
            }
        }
    }

    report
}
