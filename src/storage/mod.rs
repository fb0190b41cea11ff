//! Storage module for persisting jobs and the dedup cache
//!
//! This module handles:
//! - The [`JobStore`] collaborator interface used by the pipeline
//! - A SQLite implementation with schema management
//! - Store statistics for reporting

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{JobStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the SQLite store at `path`, creating it if needed
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}
