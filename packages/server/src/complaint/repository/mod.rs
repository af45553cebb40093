mod memory;
mod sql;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::ComplaintKind;
use sea_orm::DbErr;

use super::model::{ComplaintRecord, NewComplaint, StatusChange, UploadedImage};

pub use memory::InMemoryComplaintRepository;
pub use sql::SeaOrmComplaintRepository;

/// Result of [`ComplaintRepository::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDeletion {
    Deleted,
    Missing,
    /// A work order referenced the complaint once its row was locked; nothing was removed.
    Referenced,
}

/// Relational storage for complaints and their media rows.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Hand out the next sequence value for `kind` on `day`, starting at 1.
    ///
    /// Must be atomic: concurrent callers never receive the same value.
    async fn next_sequence(&self, kind: ComplaintKind, day: NaiveDate) -> Result<u32, DbErr>;

    /// Insert a complaint and one media row per image, all or nothing.
    ///
    /// Returns the new complaint id.
    async fn insert(
        &self,
        complaint: NewComplaint,
        images: &[UploadedImage],
    ) -> Result<i32, DbErr>;

    /// Load a complaint with its media, ordered by media id.
    async fn find(&self, kind: ComplaintKind, id: i32) -> Result<Option<ComplaintRecord>, DbErr>;

    /// Whether any work order references the complaint.
    async fn has_dependent_work_order(&self, kind: ComplaintKind, id: i32)
    -> Result<bool, DbErr>;

    /// Delete a complaint and its media rows.
    ///
    /// The work-order reference is checked again under the same lock that
    /// guards the deletion, so a work order created concurrently either
    /// blocks the delete or waits for it.
    async fn delete(&self, kind: ComplaintKind, id: i32) -> Result<RowDeletion, DbErr>;

    /// Apply a status change. Returns `None` if the complaint does not exist.
    async fn update_status(
        &self,
        kind: ComplaintKind,
        id: i32,
        change: StatusChange,
    ) -> Result<Option<ComplaintRecord>, DbErr>;
}
