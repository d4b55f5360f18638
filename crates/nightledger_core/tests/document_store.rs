use nightledger_core::db::migrations::latest_version;
use nightledger_core::db::{open_db, open_db_in_memory};
use nightledger_core::{DocumentRepository, RepoError, SqliteDocumentRepository};

#[test]
fn migrations_apply_and_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    // Table exists and is empty.
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("999"));
}

#[test]
fn sqlite_create_load_roundtrip() {
    let repo = SqliteDocumentRepository::new(open_db_in_memory().unwrap());

    assert!(repo.load("a/doc").unwrap().is_none());
    let version = repo.save("a/doc", r#"{"scores":{}}"#, None).unwrap();
    assert_eq!(version, 1);

    let doc = repo.load("a/doc").unwrap().unwrap();
    assert_eq!(doc.path, "a/doc");
    assert_eq!(doc.body, r#"{"scores":{}}"#);
    assert_eq!(doc.version, 1);
    assert!(doc.updated_at_ms > 0);
}

#[test]
fn sqlite_cas_accepts_expected_version_and_rejects_stale() {
    let repo = SqliteDocumentRepository::new(open_db_in_memory().unwrap());
    repo.save("a/doc", "one", None).unwrap();
    let v2 = repo.save("a/doc", "two", Some(1)).unwrap();
    assert_eq!(v2, 2);

    let err = repo.save("a/doc", "stale", Some(1)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    // The stored document is untouched by the rejected write.
    assert_eq!(repo.load("a/doc").unwrap().unwrap().body, "two");
}

#[test]
fn sqlite_double_create_is_rejected() {
    let repo = SqliteDocumentRepository::new(open_db_in_memory().unwrap());
    repo.save("a/doc", "one", None).unwrap();
    assert!(matches!(
        repo.save("a/doc", "two", None).unwrap_err(),
        RepoError::AlreadyExists { version: 1, .. }
    ));
}

#[test]
fn sqlite_update_of_missing_document_is_rejected() {
    let repo = SqliteDocumentRepository::new(open_db_in_memory().unwrap());
    assert!(matches!(
        repo.save("a/doc", "body", Some(1)).unwrap_err(),
        RepoError::Missing(_)
    ));
}

#[test]
fn documents_survive_reopen_of_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite3");

    {
        let repo = SqliteDocumentRepository::new(open_db(&path).unwrap());
        repo.save("a/doc", "persisted", None).unwrap();
    }

    let repo = SqliteDocumentRepository::new(open_db(&path).unwrap());
    let doc = repo.load("a/doc").unwrap().unwrap();
    assert_eq!(doc.body, "persisted");
    assert_eq!(doc.version, 1);
}
