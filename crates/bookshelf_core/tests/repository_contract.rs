use bookshelf_core::{
    Book, CsvFileRepository, InMemoryRepository, JsonFileRepository, ReadRepository, Repository,
    WriteRepository,
};
use std::sync::Arc;
use std::thread;

fn ids(books: &[Book]) -> Vec<i64> {
    books.iter().map(Book::id).collect()
}

fn assert_empty_store(repo: &dyn Repository<Book>) {
    assert!(repo.list_all().unwrap().is_empty());
    assert!(repo.get_by_id(1).unwrap().is_none());
    assert!(!repo.remove(1).unwrap());
}

fn assert_crud_contract(repo: &dyn Repository<Book>) {
    assert_empty_store(repo);

    let added = repo.add(Book::new(3, "C", "Z")).unwrap();
    assert_eq!(added, Book::new(3, "C", "Z"));
    repo.add(Book::new(1, "A", "X")).unwrap();
    repo.add(Book::new(2, "B", "Y")).unwrap();

    assert_eq!(repo.get_by_id(2).unwrap(), Some(Book::new(2, "B", "Y")));
    assert_eq!(ids(&repo.list_all().unwrap()), vec![1, 2, 3]);

    assert!(repo.remove(2).unwrap());
    assert!(repo.get_by_id(2).unwrap().is_none());
    assert_eq!(ids(&repo.list_all().unwrap()), vec![1, 3]);
    assert!(!repo.remove(2).unwrap());
}

fn assert_add_overwrites(repo: &dyn Repository<Book>) {
    repo.add(Book::new(7, "first", "author")).unwrap();
    repo.add(Book::new(7, "second", "author")).unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title(), "second");
}

fn assert_update_semantics(repo: &dyn Repository<Book>) {
    repo.add(Book::new(1, "Draft", "X")).unwrap();
    let before = repo.list_all().unwrap();

    assert!(!repo.update(Book::new(99, "Ghost", "Nobody")).unwrap());
    assert_eq!(repo.list_all().unwrap(), before);

    let original = repo.get_by_id(1).unwrap().unwrap();
    assert!(repo.update(original.with_title("Final")).unwrap());
    assert_eq!(repo.get_by_id(1).unwrap().unwrap().title(), "Final");
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

fn assert_sorted_for_any_insert_order(repo: &dyn Repository<Book>) {
    for id in [5, -2, 9, 0, 3, 11, 1] {
        repo.add(Book::new(id, format!("t{id}"), "a")).unwrap();
    }
    assert_eq!(ids(&repo.list_all().unwrap()), vec![-2, 0, 1, 3, 5, 9, 11]);
}

type Check = fn(&dyn Repository<Book>);

const CHECKS: [Check; 4] = [
    assert_crud_contract,
    assert_add_overwrites,
    assert_update_semantics,
    assert_sorted_for_any_insert_order,
];

#[test]
fn memory_backend_satisfies_contract() {
    for check in CHECKS {
        check(&InMemoryRepository::<Book>::new());
    }
}

#[test]
fn csv_backend_satisfies_contract() {
    for check in CHECKS {
        let dir = tempfile::tempdir().unwrap();
        check(&CsvFileRepository::<Book>::new(dir.path().join("books.csv")).unwrap());
    }
}

#[test]
fn json_backend_satisfies_contract() {
    for check in CHECKS {
        let dir = tempfile::tempdir().unwrap();
        check(&JsonFileRepository::<Book>::new(dir.path().join("books.json")).unwrap());
    }
}

fn read_only_view<R: ReadRepository<Book>>(repo: R) -> usize {
    repo.list_all().unwrap().len()
}

fn write_only_view<R: WriteRepository<Book>>(repo: R) {
    repo.add(Book::new(42, "Shared", "Store")).unwrap();
}

#[test]
fn one_instance_serves_read_and_write_consumers() {
    let repo = Arc::new(InMemoryRepository::<Book>::new());

    write_only_view(Arc::clone(&repo));
    assert_eq!(read_only_view(Arc::clone(&repo)), 1);
    assert_eq!(read_only_view(&*repo), 1);
}

fn hammer_concurrently(repo: Arc<dyn Repository<Book>>) {
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for n in 0..10 {
                    let id = worker * 100 + n;
                    repo.add(Book::new(id, format!("t{id}"), "a")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 40, "concurrent adds must not lose updates");
    assert!(all.windows(2).all(|pair| pair[0].id() < pair[1].id()));
}

#[test]
fn concurrent_writers_do_not_lose_updates() {
    hammer_concurrently(Arc::new(InMemoryRepository::<Book>::new()));

    let dir = tempfile::tempdir().unwrap();
    hammer_concurrently(Arc::new(
        CsvFileRepository::<Book>::new(dir.path().join("books.csv")).unwrap(),
    ));
    hammer_concurrently(Arc::new(
        JsonFileRepository::<Book>::new(dir.path().join("books.json")).unwrap(),
    ));
}
