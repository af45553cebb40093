use std::sync::Arc;

use chrono::Utc;
use common::storage::ObjectStore;
use sea_orm::DbErr;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::compensation::compensate;
use crate::complaint::error::ComplaintError;
use crate::complaint::model::{
    ComplaintDraft, ComplaintRecord, CreateComplaint, ImageUpload, NewComplaint, UploadedImage,
};
use crate::complaint::number::complaint_number;
use crate::complaint::repository::ComplaintRepository;

/// What the upload phase managed to store before it stopped.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Stored objects, in input order.
    pub uploaded: Vec<UploadedImage>,
    /// Why the phase stopped early, if it did.
    pub failure: Option<ComplaintError>,
}

/// Upload `images` in order, stopping at the first failure or cancellation.
///
/// The image that failed is not retried and later images are not attempted.
pub async fn upload_images(
    store: &dyn ObjectStore,
    images: &[ImageUpload],
    cancel: &CancellationToken,
) -> UploadOutcome {
    let mut outcome = UploadOutcome {
        uploaded: Vec::with_capacity(images.len()),
        failure: None,
    };

    for image in images {
        if cancel.is_cancelled() {
            outcome.failure = Some(ComplaintError::Cancelled);
            break;
        }

        match store.upload(&image.bytes, &image.file_name).await {
            Ok(stored) => outcome.uploaded.push(UploadedImage {
                remote_url: stored.url,
                object_id: stored.object_id,
                file_name: image.file_name.clone(),
                file_size_bytes: i64::try_from(image.bytes.len()).unwrap_or(i64::MAX),
            }),
            Err(source) => {
                outcome.failure = Some(ComplaintError::Upload {
                    file_name: image.file_name.clone(),
                    source,
                });
                break;
            }
        }
    }

    outcome
}

/// Creates complaints together with their photos.
#[derive(Clone)]
pub struct ComplaintCreationSaga {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn ComplaintRepository>,
}

impl ComplaintCreationSaga {
    pub fn new(store: Arc<dyn ObjectStore>, repository: Arc<dyn ComplaintRepository>) -> Self {
        Self { store, repository }
    }

    pub async fn create(&self, command: CreateComplaint) -> Result<ComplaintRecord, ComplaintError> {
        self.create_with_cancellation(command, &CancellationToken::new())
            .await
    }

    /// Validate, upload, number and persist a complaint.
    ///
    /// On any failure before the complaint is committed, every object uploaded
    /// by this call is deleted before the error is returned. `cancel` is
    /// checked before each upload and once more before persisting.
    #[instrument(
        skip_all,
        fields(kind = %command.kind, images = command.images.len())
    )]
    pub async fn create_with_cancellation(
        &self,
        command: CreateComplaint,
        cancel: &CancellationToken,
    ) -> Result<ComplaintRecord, ComplaintError> {
        let draft = command.validate()?;
        let kind = draft.party.kind();

        let UploadOutcome { uploaded, failure } =
            upload_images(self.store.as_ref(), &draft.images, cancel).await;
        if let Some(error) = failure {
            return Err(self.abort(error, &uploaded).await);
        }

        if cancel.is_cancelled() {
            return Err(self.abort(ComplaintError::Cancelled, &uploaded).await);
        }

        let id = match self.persist(draft, &uploaded).await {
            Ok(id) => id,
            Err(error) => return Err(self.abort(error.into(), &uploaded).await),
        };

        // Committed. The rows now own the uploaded objects.
        let record = self.repository.find(kind, id).await?.ok_or_else(|| {
            ComplaintError::Persistence(DbErr::RecordNotFound(format!(
                "{kind} complaint {id} missing after insert"
            )))
        })?;

        info!(
            id = record.id,
            number = %record.number,
            images = record.images.len(),
            "Created complaint"
        );
        Ok(record)
    }

    async fn persist(&self, draft: ComplaintDraft, uploaded: &[UploadedImage]) -> Result<i32, DbErr> {
        let kind = draft.party.kind();
        let now = Utc::now();
        let today = now.date_naive();

        let sequence = self.repository.next_sequence(kind, today).await?;
        let number = complaint_number(kind, today, sequence);

        self.repository
            .insert(
                NewComplaint {
                    number,
                    fields: draft.fields,
                    party: draft.party,
                    created_at: now,
                },
                uploaded,
            )
            .await
    }

    async fn abort(&self, error: ComplaintError, uploaded: &[UploadedImage]) -> ComplaintError {
        if !uploaded.is_empty() {
            let report = compensate(self.store.as_ref(), uploaded).await;
            if !report.is_clean() {
                warn!(
                    orphaned = report.failures.len(),
                    "Compensation left orphaned objects"
                );
            }
        }
        warn!(error = %error, "Complaint creation aborted");
        error
    }
}
