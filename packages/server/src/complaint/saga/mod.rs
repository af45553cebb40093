//! Multi-store workflows for complaints.
//!
//! A complaint row lives in the database while its photos live in the object
//! store. The two share no transaction, so creation uploads first and deletes
//! what it uploaded if anything later fails, and deletion retires remote
//! objects before removing rows.

mod compensation;
mod create;
mod delete;


pub use compensation::{CompensationReport, compensate};
pub use create::{ComplaintCreationSaga, UploadOutcome, upload_images};
pub use delete::ComplaintDeletionSaga;
