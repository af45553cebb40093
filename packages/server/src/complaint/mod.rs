pub mod error;
pub mod model;
pub mod number;
pub mod repository;
pub mod saga;

pub use error::{CompensationError, ComplaintError};
pub use repository::{
    ComplaintRepository, InMemoryComplaintRepository, RowDeletion, SeaOrmComplaintRepository,
};
pub use saga::{ComplaintCreationSaga, ComplaintDeletionSaga};
