use std::sync::Arc;

use common::storage::ObjectStore;

use crate::complaint::{ComplaintCreationSaga, ComplaintDeletionSaga, ComplaintRepository};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub object_store: Arc<dyn ObjectStore>,
    pub complaints: Arc<dyn ComplaintRepository>,
}

impl AppState {
    pub fn creation_saga(&self) -> ComplaintCreationSaga {
        ComplaintCreationSaga::new(self.object_store.clone(), self.complaints.clone())
    }

    pub fn deletion_saga(&self) -> ComplaintDeletionSaga {
        ComplaintDeletionSaga::new(self.object_store.clone(), self.complaints.clone())
    }
}
