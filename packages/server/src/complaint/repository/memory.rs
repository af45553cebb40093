use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::{ComplaintKind, ComplaintStatus};
use sea_orm::DbErr;

use super::{ComplaintRepository, RowDeletion};
use crate::complaint::model::{
    ComplaintDetails, ComplaintRecord, MediaAsset, NewComplaint, StatusChange, UploadedImage,
};

#[derive(Default)]
struct State {
    complaints: HashMap<(ComplaintKind, i32), ComplaintRecord>,
    sequences: HashMap<(ComplaintKind, NaiveDate), u32>,
    work_orders: HashSet<(ComplaintKind, i32)>,
    next_complaint_id: i32,
    next_media_id: i32,
    fail_inserts: bool,
    fail_finds: bool,
    fail_deletes: bool,
    fail_sequences: bool,
}

/// Process-local complaint repository with failure injection.
///
/// Backs the saga tests and the HTTP integration suite.
#[derive(Clone, Default)]
pub struct InMemoryComplaintRepository {
    state: Arc<Mutex<State>>,
}

fn injected(operation: &str) -> DbErr {
    DbErr::Custom(format!("injected {operation} failure"))
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent `insert` fail without writing anything.
    pub fn fail_inserts(&self, fail: bool) {
        self.lock().fail_inserts = fail;
    }

    /// Make every subsequent `find` fail.
    pub fn fail_finds(&self, fail: bool) {
        self.lock().fail_finds = fail;
    }

    /// Make every subsequent `delete` fail without removing anything.
    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    /// Make every subsequent `next_sequence` fail.
    pub fn fail_sequences(&self, fail: bool) {
        self.lock().fail_sequences = fail;
    }

    /// Record a work order that references the given complaint.
    pub fn add_work_order(&self, kind: ComplaintKind, complaint_id: i32) {
        self.lock().work_orders.insert((kind, complaint_id));
    }

    /// Number of stored complaints of `kind`.
    pub fn count(&self, kind: ComplaintKind) -> usize {
        self.lock()
            .complaints
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Total number of media rows across all complaints.
    pub fn media_count(&self) -> usize {
        self.lock()
            .complaints
            .values()
            .map(|record| record.images.len())
            .sum()
    }

    pub fn contains(&self, kind: ComplaintKind, id: i32) -> bool {
        self.lock().complaints.contains_key(&(kind, id))
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn next_sequence(&self, kind: ComplaintKind, day: NaiveDate) -> Result<u32, DbErr> {
        let mut state = self.lock();
        if state.fail_sequences {
            return Err(injected("sequence"));
        }
        let value = state.sequences.entry((kind, day)).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn insert(
        &self,
        complaint: NewComplaint,
        images: &[UploadedImage],
    ) -> Result<i32, DbErr> {
        let mut state = self.lock();
        if state.fail_inserts {
            return Err(injected("insert"));
        }

        let kind = complaint.party.kind();
        let numbers_taken = state
            .complaints
            .values()
            .any(|record| record.number == complaint.number);
        if numbers_taken {
            return Err(DbErr::Custom(format!(
                "duplicate complaint number {}",
                complaint.number
            )));
        }

        state.next_complaint_id += 1;
        let id = state.next_complaint_id;

        let mut assets = Vec::with_capacity(images.len());
        for image in images {
            state.next_media_id += 1;
            assets.push(MediaAsset {
                id: state.next_media_id,
                remote_url: image.remote_url.clone(),
                object_id: image.object_id.clone(),
                file_name: image.file_name.clone(),
                file_size_bytes: image.file_size_bytes,
                created_at: Utc::now(),
            });
        }

        let record = ComplaintRecord {
            id,
            number: complaint.number,
            details: ComplaintDetails {
                fields: complaint.fields,
                status: ComplaintStatus::default(),
                resolution: None,
                resolved_at: None,
                created_at: complaint.created_at,
                updated_at: complaint.created_at,
            },
            party: complaint.party,
            images: assets,
        };
        state.complaints.insert((kind, id), record);
        Ok(id)
    }

    async fn find(&self, kind: ComplaintKind, id: i32) -> Result<Option<ComplaintRecord>, DbErr> {
        let state = self.lock();
        if state.fail_finds {
            return Err(injected("find"));
        }
        Ok(state.complaints.get(&(kind, id)).cloned())
    }

    async fn has_dependent_work_order(
        &self,
        kind: ComplaintKind,
        id: i32,
    ) -> Result<bool, DbErr> {
        Ok(self.lock().work_orders.contains(&(kind, id)))
    }

    async fn delete(&self, kind: ComplaintKind, id: i32) -> Result<RowDeletion, DbErr> {
        let mut state = self.lock();
        if state.fail_deletes {
            return Err(injected("delete"));
        }
        if !state.complaints.contains_key(&(kind, id)) {
            return Ok(RowDeletion::Missing);
        }
        if state.work_orders.contains(&(kind, id)) {
            return Ok(RowDeletion::Referenced);
        }
        state.complaints.remove(&(kind, id));
        Ok(RowDeletion::Deleted)
    }

    async fn update_status(
        &self,
        kind: ComplaintKind,
        id: i32,
        change: StatusChange,
    ) -> Result<Option<ComplaintRecord>, DbErr> {
        let mut state = self.lock();
        let Some(record) = state.complaints.get_mut(&(kind, id)) else {
            return Ok(None);
        };
        record.details.apply_status_change(change, Utc::now());
        Ok(Some(record.clone()))
    }
}
