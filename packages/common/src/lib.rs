pub mod complaint;
pub mod config;
pub mod storage;

pub use complaint::{ComplaintKind, ComplaintPriority, ComplaintStatus};
