//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::Job;
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage collaborator used by the pipeline
///
/// Implementations must be safe to call from many worker tasks at once.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Stores one enriched job
    ///
    /// A job whose ID is already stored is not an error.
    async fn put_job(&self, job: &Job) -> StorageResult<()>;

    /// Loads the set of job IDs seen by earlier runs
    async fn load_id_set(&self) -> StorageResult<HashSet<String>>;

    /// Replaces the persisted set of seen job IDs
    async fn persist_id_set(&self, ids: &HashSet<String>) -> StorageResult<()>;
}
