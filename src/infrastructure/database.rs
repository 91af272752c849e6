use crate::domain::{DocumentType, NewSubmission, SubmissionRecord};
use crate::infrastructure::config::Config;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// Append-only store of submission records.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, submission: &NewSubmission) -> Result<SubmissionRecord, DatabaseError>;
    /// All records, optionally restricted to one document type, in insertion order.
    fn find_all(
        &self,
        document_type: Option<DocumentType>,
    ) -> Result<Vec<SubmissionRecord>, DatabaseError>;
    fn count(&self) -> Result<usize, DatabaseError>;
}

impl ToSql for DocumentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DocumentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        Self::open(path, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the database named by `config`. An unopenable path is a startup
    /// error unless the config explicitly allows in-memory storage.
    pub fn from_config(config: &Config) -> Result<Self, DatabaseError> {
        match Self::open(&config.db_path, config.busy_timeout) {
            Ok(repo) => Ok(repo),
            Err(e) if config.allow_in_memory => {
                tracing::warn!(
                    path = %config.db_path.display(),
                    error = %e,
                    "failed to open database, serving from in-memory storage; records will not survive a restart"
                );
                Self::new_in_memory()
            }
            Err(e) => Err(e),
        }
    }

    pub fn new_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), DatabaseError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS submissions (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL CHECK (length(name) > 0),
                document_type TEXT NOT NULL CHECK (document_type IN
                    ('aadhaar', 'pan', 'dl', 'voterid', 'face', 'digilocker')),
                id_number TEXT NOT NULL CHECK (length(id_number) > 0),
                file_name TEXT,
                file_data TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<SubmissionRecord, rusqlite::Error> {
        Ok(SubmissionRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            document_type: row.get(2)?,
            id_number: row.get(3)?,
            file_name: row.get(4)?,
            file_data: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn check_required(submission: &NewSubmission) -> Result<(), DatabaseError> {
        if submission.name.is_empty() {
            return Err(DatabaseError::SchemaValidation(
                "name is required".to_string(),
            ));
        }

        if submission.id_number.is_empty() {
            return Err(DatabaseError::SchemaValidation(
                "idNumber is required".to_string(),
            ));
        }

        Ok(())
    }
}

impl SubmissionRepository for SqliteRepository {
    fn insert(&self, submission: &NewSubmission) -> Result<SubmissionRecord, DatabaseError> {
        Self::check_required(submission)?;

        let record = SubmissionRecord::from_new(submission);
        let conn = self.lock()?;

        match conn.execute(
            "INSERT INTO submissions
                (id, name, document_type, id_number, file_name, file_data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &record.id,
                &record.name,
                &record.document_type,
                &record.id_number,
                &record.file_name,
                &record.file_data,
                &record.created_at,
                &record.updated_at
            ],
        ) {
            Ok(_) => Ok(record),
            Err(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DatabaseError::SchemaValidation(
                    msg.unwrap_or_else(|| "constraint violation".to_string()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_all(
        &self,
        document_type: Option<DocumentType>,
    ) -> Result<Vec<SubmissionRecord>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, document_type, id_number, file_name, file_data, created_at, updated_at
             FROM submissions
             WHERE ?1 IS NULL OR document_type = ?1
             ORDER BY seq",
        )?;

        let records = stmt
            .query_map(params![document_type], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
