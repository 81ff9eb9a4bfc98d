//! gymfusion - gym tracker backup editor core
//!
//! Import a backup file, normalize legacy layouts, validate it into typed
//! records, edit it in memory and export it back in the legacy shape.

pub mod edit;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod stats;
pub mod store;

pub use model::BackupData;
pub use store::{BackupPatch, DocumentStore, ImportError};
