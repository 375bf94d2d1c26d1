use bookshelf_core::{
    open_book_repository, BackendKind, Book, BookService, ConfigError, LoadPolicy, StoreConfig,
};

#[test]
fn defaults_to_fail_soft_memory_store() {
    let config = StoreConfig::from_json_str("{}").unwrap();

    assert_eq!(config.backend, BackendKind::Memory);
    assert_eq!(config.load_policy, LoadPolicy::FailSoft);
    assert!(config.path.is_none());
    assert!(!config.csv_has_header);
}

#[test]
fn parses_file_backend_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    let text = serde_json::json!({
        "backend": "csv",
        "path": path,
        "load_policy": "strict",
        "csv_has_header": true
    })
    .to_string();

    let config = StoreConfig::from_json_str(&text).unwrap();
    assert_eq!(config.backend, BackendKind::Csv);
    assert_eq!(config.path.as_deref(), Some(path.as_path()));
    assert_eq!(config.load_policy, LoadPolicy::Strict);
    assert!(config.csv_has_header);
}

#[test]
fn rejects_unknown_fields_and_backends() {
    assert!(matches!(
        StoreConfig::from_json_str(r#"{ "backend": "sqlite" }"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        StoreConfig::from_json_str(r#"{ "bakend": "csv" }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn file_backend_without_path_fails_at_construction() {
    let config = StoreConfig {
        backend: BackendKind::Json,
        ..StoreConfig::default()
    };

    let err = open_book_repository(&config).err().expect("config must be rejected");
    assert!(matches!(err, ConfigError::MissingPath(BackendKind::Json)));
}

#[test]
fn file_backend_with_missing_parent_dir_fails_at_construction() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::csv(dir.path().join("missing").join("books.csv"));

    let err = open_book_repository(&config).err().expect("config must be rejected");
    assert!(matches!(err, ConfigError::MissingParentDir(_)));
}

#[test]
fn every_backend_opens_into_a_working_service() {
    let dir = tempfile::tempdir().unwrap();
    let configs = [
        StoreConfig::memory(),
        StoreConfig::csv(dir.path().join("books.csv")),
        StoreConfig::json(dir.path().join("books.json")).with_load_policy(LoadPolicy::Strict),
    ];

    for config in configs {
        let service = BookService::new(open_book_repository(&config).unwrap());
        service.register(Book::new(2, "B", "Y")).unwrap();
        service.register(Book::new(1, "A", "X")).unwrap();

        let ids: Vec<_> = service.list_all().unwrap().iter().map(Book::id).collect();
        assert_eq!(ids, vec![1, 2], "backend {:?}", config.backend);
    }
}

#[test]
fn file_backed_configs_share_data_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::json(dir.path().join("books.json"));

    let first = BookService::new(open_book_repository(&config).unwrap());
    first.register(Book::new(1, "Persisted", "Author")).unwrap();
    drop(first);

    let second = BookService::new(open_book_repository(&config).unwrap());
    assert_eq!(
        second.find_by_id(1).unwrap(),
        Some(Book::new(1, "Persisted", "Author"))
    );
}

#[test]
fn whitespace_path_fails_at_construction() {
    let config = StoreConfig::json("   ");

    let err = open_book_repository(&config).err().expect("config must be rejected");
    assert!(matches!(err, ConfigError::MissingPath(BackendKind::Json)));
}
