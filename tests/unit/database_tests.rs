use kyc_portal::domain::{DocumentType, NewSubmission};
use kyc_portal::infrastructure::config::Config;
use kyc_portal::infrastructure::database::{DatabaseError, SqliteRepository, SubmissionRepository};
use std::sync::Arc;

fn submission(name: &str, document_type: DocumentType) -> NewSubmission {
    NewSubmission::new(name, document_type, None)
}

#[test]
fn test_init_database_creates_schema() {
    let repo = SqliteRepository::new_in_memory().expect("Failed to create repository");

    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.find_all(None).unwrap().is_empty());
}

#[test]
fn test_insert_persists_all_fields() {
    let repo = SqliteRepository::new_in_memory().unwrap();
    let new = NewSubmission::new("Asha", DocumentType::Aadhaar, Some("123456789012".into()))
        .with_file(Some("aadhaar.pdf".into()), Some("data:application/pdf;base64,JVBERi0=".into()));

    let stored = repo.insert(&new).expect("Failed to insert submission");
    let found = repo.find_all(None).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0], stored);
    assert_eq!(found[0].name, "Asha");
    assert_eq!(found[0].document_type, DocumentType::Aadhaar);
    assert_eq!(found[0].id_number, "123456789012");
    assert_eq!(found[0].file_name.as_deref(), Some("aadhaar.pdf"));
}

#[test]
fn test_insert_rejects_empty_name() {
    let repo = SqliteRepository::new_in_memory().unwrap();

    let result = repo.insert(&submission("", DocumentType::Pan));

    assert!(matches!(result, Err(DatabaseError::SchemaValidation(_))));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn test_insert_accepts_whitespace_name() {
    let repo = SqliteRepository::new_in_memory().unwrap();

    let stored = repo.insert(&submission("  ", DocumentType::Pan)).unwrap();

    assert_eq!(stored.name, "  ");
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn test_from_config_fails_on_unopenable_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("missing").join("submissions.db"),
        ..Config::default()
    };

    let result = SqliteRepository::from_config(&config);

    assert!(matches!(result, Err(DatabaseError::SqliteError(_))));
}

#[test]
fn test_from_config_in_memory_only_when_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("missing").join("submissions.db"),
        allow_in_memory: true,
        ..Config::default()
    };

    let repo = SqliteRepository::from_config(&config).expect("in-memory fallback should open");

    assert_eq!(repo.count().unwrap(), 0);
    assert!(!config.db_path.exists());
}

#[test]
fn test_from_config_opens_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("submissions.db"),
        ..Config::default()
    };

    let repo = SqliteRepository::from_config(&config).unwrap();
    repo.insert(&submission("A", DocumentType::Aadhaar)).unwrap();

    assert!(config.db_path.exists());
}

#[test]
fn test_insert_rejects_empty_id_number() {
    let repo = SqliteRepository::new_in_memory().unwrap();
    let mut new = submission("A", DocumentType::Pan);
    new.id_number.clear();

    let result = repo.insert(&new);

    let err_msg = result.unwrap_err().to_string();
    assert!(err_msg.contains("idNumber"));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn test_no_deduplication() {
    let repo = SqliteRepository::new_in_memory().unwrap();
    let new = submission("A", DocumentType::Dl);

    let first = repo.insert(&new).unwrap();
    let second = repo.insert(&new).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn test_find_all_filters_by_type_in_insertion_order() {
    let repo = SqliteRepository::new_in_memory().unwrap();

    repo.insert(&submission("first", DocumentType::Face)).unwrap();
    repo.insert(&submission("other", DocumentType::DigiLocker)).unwrap();
    repo.insert(&submission("second", DocumentType::Face)).unwrap();

    let faces = repo.find_all(Some(DocumentType::Face)).unwrap();
    let names: Vec<&str> = faces.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);

    assert_eq!(repo.find_all(Some(DocumentType::DigiLocker)).unwrap().len(), 1);
    assert!(repo.find_all(Some(DocumentType::Pan)).unwrap().is_empty());
    assert_eq!(repo.find_all(None).unwrap().len(), 3);
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("submissions.db");

    let stored = {
        let repo = SqliteRepository::new(&path).unwrap();
        repo.insert(&submission("A", DocumentType::VoterId)).unwrap()
    };

    let repo = SqliteRepository::new(&path).unwrap();
    let found = repo.find_all(None).unwrap();
    assert_eq!(found, vec![stored]);
}

#[test]
fn test_concurrent_inserts() {
    let repo = Arc::new(SqliteRepository::new_in_memory().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                for j in 0..10 {
                    repo.insert(&submission(&format!("user-{i}-{j}"), DocumentType::Face))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.find_all(Some(DocumentType::Face)).unwrap().len(), 80);
}
