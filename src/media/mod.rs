//! Listing media for Estate.
//!
//! Upload limits and on-disk storage for listing photos and videos.

mod policy;
mod storage;

pub use policy::{MediaKind, Upload, UploadPolicy};
pub use storage::{MediaStorage, StoredMedia};
