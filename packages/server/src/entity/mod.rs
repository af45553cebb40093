pub mod complaint_image;
pub mod complaint_sequence;
pub mod customer_complaint;
pub mod work_order;
pub mod worker_complaint;
