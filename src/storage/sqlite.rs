//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the JobStore trait.

use crate::model::Job;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite storage backend
///
/// The connection sits behind a mutex so one store can be shared by every
/// worker task.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_job(&self, job: &Job) -> StorageResult<bool> {
        let languages = serde_json::to_string(&job.languages)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let technologies = serde_json::to_string(&job.technologies)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let inserted = self.conn().execute(
            "INSERT INTO jobs (
                job_id, title, company, location, modality, posted_date, expires_date,
                salary, url, min_years_experience, min_degree, domain, description,
                parsed_description, languages, technologies, is_software_engineer_related,
                stored_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
             ON CONFLICT(job_id) DO NOTHING",
            params![
                job.job_id,
                job.title,
                job.company,
                job.location,
                job.modality,
                job.posted_date,
                job.expires_date,
                job.salary,
                job.url,
                job.min_years_experience,
                job.min_degree,
                job.domain,
                job.description,
                job.parsed_description,
                languages,
                technologies,
                job.is_software_engineer_related,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(inserted > 0)
    }

    fn read_id_set(&self) -> StorageResult<HashSet<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT job_id FROM seen_job_ids")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(ids)
    }

    fn replace_id_set(&self, ids: &HashSet<String>) -> StorageResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM seen_job_ids", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO seen_job_ids (job_id) VALUES (?1)")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Looks up one stored job
    pub fn get_job(&self, job_id: &str) -> StorageResult<Option<Job>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT job_id, title, company, location, modality, posted_date, expires_date,
                        salary, url, min_years_experience, min_degree, domain, description,
                        parsed_description, languages, technologies, is_software_engineer_related
                 FROM jobs WHERE job_id = ?1",
                params![job_id],
                job_from_row,
            )
            .optional()?;

        row.transpose()
    }

    // ===== Statistics =====

    pub fn count_jobs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn count_related_jobs(&self) -> StorageResult<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM jobs WHERE is_software_engineer_related = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn count_seen_ids(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM seen_job_ids", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Job counts per domain category, largest first
    pub fn jobs_by_domain(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT COALESCE(domain, 'Unclassified') AS d, COUNT(*) AS n
             FROM jobs
             GROUP BY d
             ORDER BY n DESC, d",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// Maps a `jobs` row back to a [`Job`]
///
/// The outer result carries SQLite errors; the inner one carries JSON
/// decoding errors for the list columns.
fn job_from_row(row: &Row<'_>) -> rusqlite::Result<StorageResult<Job>> {
    let languages: String = row.get(14)?;
    let technologies: String = row.get(15)?;

    let decode = |raw: &str| {
        serde_json::from_str::<Vec<String>>(raw)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    };
    let (languages, technologies) = match (decode(&languages), decode(&technologies)) {
        (Ok(l), Ok(t)) => (l, t),
        (Err(e), _) | (_, Err(e)) => return Ok(Err(e)),
    };

    Ok(Ok(Job {
        job_id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        location: row.get(3)?,
        modality: row.get(4)?,
        posted_date: row.get(5)?,
        expires_date: row.get(6)?,
        salary: row.get(7)?,
        url: row.get(8)?,
        min_years_experience: row.get(9)?,
        min_degree: row.get(10)?,
        domain: row.get(11)?,
        description: row.get(12)?,
        parsed_description: row.get(13)?,
        languages,
        technologies,
        is_software_engineer_related: row.get(16)?,
    }))
}

#[async_trait]
impl JobStore for SqliteStore {
    async fn put_job(&self, job: &Job) -> StorageResult<()> {
        if !self.insert_job(job)? {
            tracing::debug!("Job {} already stored", job.job_id);
        }
        Ok(())
    }

    async fn load_id_set(&self) -> StorageResult<HashSet<String>> {
        self.read_id_set()
    }

    async fn persist_id_set(&self, ids: &HashSet<String>) -> StorageResult<()> {
        self.replace_id_set(ids)
    }
}
