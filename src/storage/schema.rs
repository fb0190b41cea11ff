//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Job-Sieve database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Enriched job listings, one row per job ID
CREATE TABLE IF NOT EXISTS jobs (
    job_id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    location TEXT NOT NULL,
    modality TEXT,
    posted_date TEXT NOT NULL,
    expires_date TEXT,
    salary TEXT NOT NULL,
    url TEXT NOT NULL,
    min_years_experience INTEGER,
    min_degree TEXT,
    domain TEXT,
    description TEXT NOT NULL,
    parsed_description TEXT,
    languages TEXT NOT NULL,
    technologies TEXT NOT NULL,
    is_software_engineer_related INTEGER NOT NULL DEFAULT 0,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_domain ON jobs(domain);
CREATE INDEX IF NOT EXISTS idx_jobs_related ON jobs(is_software_engineer_related);

-- Dedup cache: every job ID seen by any completed run
CREATE TABLE IF NOT EXISTS seen_job_ids (
    job_id TEXT PRIMARY KEY
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
