use std::sync::Arc;

use common::ComplaintKind;
use common::storage::ObjectStore;
use tracing::{info, instrument, warn};

use super::compensation::delete_objects;
use crate::complaint::error::ComplaintError;
use crate::complaint::model::MediaAsset;
use crate::complaint::repository::{ComplaintRepository, RowDeletion};

/// Removes complaints together with their photos.
#[derive(Clone)]
pub struct ComplaintDeletionSaga {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn ComplaintRepository>,
}

impl ComplaintDeletionSaga {
    pub fn new(store: Arc<dyn ObjectStore>, repository: Arc<dyn ComplaintRepository>) -> Self {
        Self { store, repository }
    }

    /// Delete a complaint, its remote objects and its media rows.
    ///
    /// Returns `Ok(false)` if the complaint does not exist. Refuses with
    /// `Conflict` while a work order references it. Remote delete failures
    /// are logged and do not stop the rows from being removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: ComplaintKind, id: i32) -> Result<bool, ComplaintError> {
        let Some(record) = self.repository.find(kind, id).await? else {
            return Ok(false);
        };

        if self.repository.has_dependent_work_order(kind, id).await? {
            return Err(ComplaintError::Conflict(format!(
                "Cannot delete complaint {}: it is referenced by a work order",
                record.number
            )));
        }

        let object_id = (|image: &MediaAsset| image.object_id.as_str()) as fn(&MediaAsset) -> &str;
        let report = delete_objects(self.store.as_ref(), record.images.iter().map(object_id))
        .await;
        if !report.is_clean() {
            warn!(
                number = %record.number,
                orphaned = report.failures.len(),
                "Deleting complaint despite remote delete failures"
            );
        }

        match self.repository.delete(kind, id).await? {
            RowDeletion::Deleted => {
                info!(number = %record.number, images = record.images.len(), "Deleted complaint");
                Ok(true)
            }
            RowDeletion::Missing => Ok(false),
            RowDeletion::Referenced => {
                warn!(
                    number = %record.number,
                    "Work order appeared during deletion; remote objects already removed"
                );
                Err(ComplaintError::Conflict(format!(
                    "Cannot delete complaint {}: it is referenced by a work order",
                    record.number
                )))
            }
        }
    }
}
