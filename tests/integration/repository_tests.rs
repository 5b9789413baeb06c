use promptdupe::duplicates::{DuplicateScanner, NoopYielder, ScanOptions};
use promptdupe::entry::{Entry, EntryRepository, FileRepository, RepositoryError};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

/// In-memory repository, as a host application would supply.
struct MemoryRepository(Vec<Entry>);

impl EntryRepository for MemoryRepository {
    fn get_all(&self) -> Result<Vec<Entry>, RepositoryError> {
        Ok(self.0.clone())
    }
}

fn scan(repo: &dyn EntryRepository) -> Vec<Vec<String>> {
    let entries = repo.get_all().unwrap();
    DuplicateScanner::new(ScanOptions::default().with_yielder(Arc::new(NoopYielder)))
        .scan(&entries)
        .unwrap()
        .iter()
        .map(|g| g.ids().into_iter().map(String::from).collect())
        .collect()
}

#[test]
fn test_scan_json_export() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.json");
    fs::write(
        &path,
        r#"[
  {"id": "p1", "title": "Code review", "content": "Review this pull request for bugs"},
  {"id": "p2", "title": "Recipe", "content": "Suggest a vegetarian dinner"},
  {"id": "p3", "title": "Code review", "content": "  Review this pull request for bugs\n"}
]"#,
    )
    .unwrap();

    assert_eq!(scan(&FileRepository::new(&path)), vec![vec!["p1", "p3"]]);
}

#[test]
fn test_scan_csv_export() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.csv");
    fs::write(
        &path,
        "id,title,content\n\
         1,Email,Draft a polite reminder email\n\
         2,Email,Draft a polite reminder e-mail\n\
         3,Poem,\"Roses are red, violets are blue\"\n",
    )
    .unwrap();

    assert_eq!(scan(&FileRepository::new(&path)), vec![vec!["1", "2"]]);
}

#[test]
fn test_scan_memory_repository() {
    let repo = MemoryRepository(vec![
        Entry::new("x", "A", "same"),
        Entry::new("y", "B", "different"),
        Entry::new("z", "A", "same"),
    ]);
    assert_eq!(scan(&repo), vec![vec!["x", "z"]]);
}

#[test]
fn test_csv_missing_column_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "id,title\n1,Only a title\n").unwrap();

    let result = FileRepository::new(&path).get_all();
    assert!(matches!(result, Err(RepositoryError::Csv { .. })));
}

#[test]
fn test_empty_json_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();

    let repo = FileRepository::new(&path);
    assert!(repo.get_all().unwrap().is_empty());
    assert!(scan(&repo).is_empty());
}
