//! Document repository contracts and implementations.
//!
//! # Responsibility
//! - Load and save versioned JSON documents at well-known paths.
//! - Enforce compare-and-swap semantics on every save.
//!
//! # Invariants
//! - `version` starts at 1 on create and increments by exactly 1 per
//!   accepted save.
//! - A save with a stale expected version leaves the stored document
//!   unchanged and reports both versions.

use crate::db::DbError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure modes of document persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// First-write attempted but the document already exists.
    AlreadyExists { path: String, version: u64 },
    /// CAS update attempted against a document that does not exist.
    Missing(String),
    /// The stored version moved past the writer's expectation.
    VersionConflict {
        path: String,
        expected: u64,
        actual: u64,
    },
    /// Shared connection state is unusable (poisoned lock).
    Storage(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyExists { path, version } => {
                write!(f, "document already exists at `{path}` (version {version})")
            }
            Self::Missing(path) => write!(f, "document missing at `{path}`"),
            Self::VersionConflict {
                path,
                expected,
                actual,
            } => write!(
                f,
                "version conflict at `{path}`: expected {expected}, stored {actual}"
            ),
            Self::Storage(message) => write!(f, "document storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One stored document plus its version metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDocument {
    pub path: String,
    pub body: String,
    pub version: u64,
    pub updated_at_ms: i64,
}

/// Storage seam for versioned documents.
///
/// `expected_version == None` is a first-write create; `Some(v)` updates
/// iff the stored version is still `v`.
pub trait DocumentRepository {
    fn load(&self, path: &str) -> RepoResult<Option<VersionedDocument>>;
    fn save(&self, path: &str, body: &str, expected_version: Option<u64>) -> RepoResult<u64>;
}

/// SQLite-backed document repository over the `documents` table.
///
/// Owns its connection behind a mutex so it can be shared across
/// sessions.
pub struct SqliteDocumentRepository {
    conn: Mutex<Connection>,
}

impl SqliteDocumentRepository {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Storage("sqlite connection lock poisoned".to_string()))
    }
}

impl DocumentRepository for SqliteDocumentRepository {
    fn load(&self, path: &str) -> RepoResult<Option<VersionedDocument>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT body, version, updated_at FROM documents WHERE path = ?1;",
                [path],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(body, version, updated_at_ms)| VersionedDocument {
            path: path.to_string(),
            body,
            version,
            updated_at_ms,
        }))
    }

    fn save(&self, path: &str, body: &str, expected_version: Option<u64>) -> RepoResult<u64> {
        let conn = self.lock()?;
        let now_ms = Utc::now().timestamp_millis();

        match expected_version {
            None => {
                let existing = conn
                    .query_row(
                        "SELECT version FROM documents WHERE path = ?1;",
                        [path],
                        |row| row.get::<_, u64>(0),
                    )
                    .optional()?;
                if let Some(version) = existing {
                    return Err(RepoError::AlreadyExists {
                        path: path.to_string(),
                        version,
                    });
                }

                conn.execute(
                    "INSERT INTO documents (path, body, version, updated_at)
                     VALUES (?1, ?2, 1, ?3);",
                    params![path, body, now_ms],
                )?;
                Ok(1)
            }
            Some(expected) => {
                let changed = conn.execute(
                    "UPDATE documents
                     SET body = ?1, version = version + 1, updated_at = ?2
                     WHERE path = ?3 AND version = ?4;",
                    params![body, now_ms, path, expected],
                )?;
                if changed == 1 {
                    return Ok(expected + 1);
                }

                let actual = conn
                    .query_row(
                        "SELECT version FROM documents WHERE path = ?1;",
                        [path],
                        |row| row.get::<_, u64>(0),
                    )
                    .optional()?;
                match actual {
                    None => Err(RepoError::Missing(path.to_string())),
                    Some(actual) => Err(RepoError::VersionConflict {
                        path: path.to_string(),
                        expected,
                        actual,
                    }),
                }
            }
        }
    }
}

/// In-process document repository used by tests and the demo CLI.
#[derive(Default)]
pub struct MemoryDocumentRepository {
    docs: Mutex<BTreeMap<String, VersionedDocument>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, BTreeMap<String, VersionedDocument>>> {
        self.docs
            .lock()
            .map_err(|_| RepoError::Storage("memory document lock poisoned".to_string()))
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn load(&self, path: &str) -> RepoResult<Option<VersionedDocument>> {
        Ok(self.lock()?.get(path).cloned())
    }

    fn save(&self, path: &str, body: &str, expected_version: Option<u64>) -> RepoResult<u64> {
        let mut docs = self.lock()?;
        let now_ms = Utc::now().timestamp_millis();

        match (docs.get_mut(path), expected_version) {
            (Some(doc), None) => Err(RepoError::AlreadyExists {
                path: path.to_string(),
                version: doc.version,
            }),
            (Some(doc), Some(expected)) => {
                if doc.version != expected {
                    return Err(RepoError::VersionConflict {
                        path: path.to_string(),
                        expected,
                        actual: doc.version,
                    });
                }
                doc.body = body.to_string();
                doc.version += 1;
                doc.updated_at_ms = now_ms;
                Ok(doc.version)
            }
            (None, Some(_)) => Err(RepoError::Missing(path.to_string())),
            (None, None) => {
                docs.insert(
                    path.to_string(),
                    VersionedDocument {
                        path: path.to_string(),
                        body: body.to_string(),
                        version: 1,
                        updated_at_ms: now_ms,
                    },
                );
                Ok(1)
            }
        }
    }
}
