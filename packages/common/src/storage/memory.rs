use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::error::StorageError;
use super::key::new_object_id;
use super::traits::{ObjectStore, StoredObject};

#[derive(Default)]
struct State {
    objects: HashMap<String, Vec<u8>>,
    upload_calls: Vec<String>,
    delete_calls: Vec<String>,
    fail_upload_on: HashSet<usize>,
    fail_deletes: HashSet<String>,
    fail_all_deletes: bool,
}

/// In-memory object store with call recording and failure injection.
///
/// Clones share the same state, so a test can keep one handle for
/// assertions while the code under test owns another.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not poison assertions in another.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the `n`th upload call (1-based, counted across the store's lifetime) fail.
    pub fn fail_upload_on(&self, n: usize) {
        self.lock().fail_upload_on.insert(n);
    }

    /// Make deletes of `object_id` fail while leaving the object in place.
    pub fn fail_delete_of(&self, object_id: &str) {
        self.lock().fail_deletes.insert(object_id.to_string());
    }

    /// Make every delete call fail.
    pub fn fail_all_deletes(&self) {
        self.lock().fail_all_deletes = true;
    }

    /// File names passed to `upload`, in call order, including failed calls.
    pub fn upload_calls(&self) -> Vec<String> {
        self.lock().upload_calls.clone()
    }

    /// Object ids passed to `delete`, in call order, including failed calls.
    pub fn delete_calls(&self) -> Vec<String> {
        self.lock().delete_calls.clone()
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.lock().objects.contains_key(object_id)
    }

    pub fn get(&self, object_id: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(object_id).cloned()
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, data: &[u8], file_name: &str) -> Result<StoredObject, StorageError> {
        let mut state = self.lock();
        state.upload_calls.push(file_name.to_string());
        let call = state.upload_calls.len();

        if state.fail_upload_on.contains(&call) {
            return Err(StorageError::Injected(format!(
                "upload #{call} ({file_name}) rejected"
            )));
        }

        let object_id = new_object_id(file_name);
        state.objects.insert(object_id.clone(), data.to_vec());

        Ok(StoredObject {
            url: format!("memory://{object_id}"),
            object_id,
        })
    }

    async fn delete(&self, object_id: &str) -> Result<bool, StorageError> {
        let mut state = self.lock();
        state.delete_calls.push(object_id.to_string());

        if state.fail_all_deletes || state.fail_deletes.contains(object_id) {
            return Err(StorageError::Injected(format!("delete of {object_id} rejected")));
        }

        Ok(state.objects.remove(object_id).is_some())
    }
}
