use bookshelf_core::{
    Book, JsonFileRepository, LoadPolicy, ReadRepository, RepoError, WriteRepository,
};
use std::fs;

#[test]
fn document_is_pretty_camel_case_array_sorted_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let repo = JsonFileRepository::<Book>::new(&path).unwrap();

    repo.add(Book::new(2, "Refactoring", "Martin Fowler")).unwrap();
    repo.add(Book::new(1, "Clean Code", "Robert C. Martin")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'), "document should be indented: {text}");

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "id": 1, "title": "Clean Code", "author": "Robert C. Martin" },
            { "id": 2, "title": "Refactoring", "author": "Martin Fowler" }
        ])
    );
}

#[test]
fn records_survive_reload_in_fresh_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let written = vec![
        Book::new(3, "Livro, com vírgula", "Autor \"com aspas\""),
        Book::new(1, "multi\nline", "tab\tauthor"),
        Book::new(2, "{ \"json\": [] }", "\\backslash"),
    ];

    let writer = JsonFileRepository::<Book>::new(&path).unwrap();
    for book in &written {
        writer.add(book.clone()).unwrap();
    }

    let reader = JsonFileRepository::<Book>::new(&path).unwrap();
    let mut expected = written;
    expected.sort_by_key(Book::id);
    assert_eq!(reader.list_all().unwrap(), expected);
}

#[test]
fn missing_or_blank_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let missing = JsonFileRepository::<Book>::with_policy(
        dir.path().join("absent.json"),
        LoadPolicy::Strict,
    )
    .unwrap();
    assert!(missing.list_all().unwrap().is_empty());

    let blank_path = dir.path().join("blank.json");
    fs::write(&blank_path, "  \n").unwrap();
    let blank = JsonFileRepository::<Book>::with_policy(&blank_path, LoadPolicy::Strict).unwrap();
    assert!(blank.list_all().unwrap().is_empty());
    assert!(blank.get_by_id(1).unwrap().is_none());
}

#[test]
fn fail_soft_treats_unparsable_document_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(&path, "[{ \"id\": 1, \"title\": ").unwrap();

    let repo = JsonFileRepository::<Book>::new(&path).unwrap();
    assert!(repo.list_all().unwrap().is_empty());
    assert!(repo.get_by_id(1).unwrap().is_none());

    repo.add(Book::new(5, "Fresh", "Start")).unwrap();
    assert_eq!(repo.list_all().unwrap(), vec![Book::new(5, "Fresh", "Start")]);
}

#[test]
fn strict_policy_surfaces_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(&path, "{\"not\": \"an array\"}").unwrap();

    let repo = JsonFileRepository::<Book>::with_policy(&path, LoadPolicy::Strict).unwrap();
    assert!(matches!(
        repo.list_all().unwrap_err(),
        RepoError::Corrupt { .. }
    ));
    assert!(matches!(
        repo.add(Book::new(1, "a", "b")).unwrap_err(),
        RepoError::Corrupt { .. }
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"not\": \"an array\"}");
}

#[test]
fn remove_of_absent_id_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let repo = JsonFileRepository::<Book>::new(&path).unwrap();

    assert!(!repo.remove(1).unwrap());
    assert!(!path.exists());
}

#[test]
fn save_leaves_no_temporary_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let repo = JsonFileRepository::<Book>::new(&path).unwrap();

    for id in 0..5 {
        repo.add(Book::new(id, "t", "a")).unwrap();
    }
    repo.remove(3).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("books.json")]);
}

#[test]
fn blank_path_is_rejected_at_construction() {
    for path in ["", "  \n"] {
        let err = JsonFileRepository::<Book>::new(path).err().expect("blank path");
        assert!(matches!(err, RepoError::InvalidPath(_)), "{err}");
    }
    let err = JsonFileRepository::<Book>::with_policy("", LoadPolicy::Strict)
        .err()
        .expect("blank path");
    assert!(matches!(err, RepoError::InvalidPath(_)));
}

#[test]
fn null_document_is_empty_store_under_strict_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(&path, "null\n").unwrap();

    let repo = JsonFileRepository::<Book>::with_policy(&path, LoadPolicy::Strict).unwrap();
    assert!(repo.list_all().unwrap().is_empty());

    repo.add(Book::new(1, "A", "X")).unwrap();
    assert_eq!(repo.list_all().unwrap(), vec![Book::new(1, "A", "X")]);
}
