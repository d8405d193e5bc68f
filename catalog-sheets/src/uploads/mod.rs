//! Upload lifecycle tracking for product imports

pub mod lifecycle;
pub mod naming;
pub mod store;
pub mod tracker;

pub use lifecycle::{UploadRecord, UploadStatus};
pub use naming::generate_storage_name;
pub use store::UploadStore;
pub use tracker::{ImportOutcome, UploadTracker};
