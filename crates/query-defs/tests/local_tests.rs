use std::path::PathBuf;

use query_defs::{FileItem, LocalLoader, Loader, LoaderError, QueryType};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/repo")
}

fn fixture_loader() -> LocalLoader {
    LocalLoader::new(fixture_root())
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("query-defs-test-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn fetch_files_lists_recognized_queries() {
    let files = fixture_loader().fetch_files().await.unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(files.len(), 9, "got: {names:?}");
    assert!(names.contains(&"test-rq.rq"));
    assert!(names.contains(&"test-sparql.sparql"));
    assert!(names.contains(&"test-tpf.tpf"));
    assert!(names.contains(&"test-json.json"));
    assert!(names.contains(&"nested-select.rq"), "should descend into subdirectories");
}

#[tokio::test]
async fn fetch_files_skips_docs_and_hidden_entries() {
    let files = fixture_loader().fetch_files().await.unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();

    assert!(!names.contains(&"README.md"));
    assert!(!names.contains(&"LICENSE"));
    assert!(!names.contains(&"endpoint.txt"));
    assert!(!names.contains(&"secret.rq"), "hidden directory should be skipped");
    assert!(!names.contains(&".draft.rq"), "hidden file should be skipped");
}

#[tokio::test]
async fn every_item_has_a_download_url() {
    let files = fixture_loader().fetch_files().await.unwrap();
    for item in &files {
        assert!(!item.download_url.is_empty(), "{} has no download_url", item.name);
    }
}

#[tokio::test]
async fn fetch_files_is_reproducible() {
    let loader = fixture_loader();
    let first = loader.fetch_files().await.unwrap();
    let second = loader.fetch_files().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn get_text_for_returns_content_of_each_item() {
    let loader = fixture_loader();
    for item in loader.fetch_files().await.unwrap() {
        let text = loader.get_text_for(&item).await.unwrap();
        assert!(!text.is_empty(), "{} should have content", item.name);
    }
}

#[tokio::test]
async fn get_text_for_rejects_item_without_url() {
    let result = fixture_loader().get_text_for(&FileItem::default()).await;
    assert!(matches!(result, Err(LoaderError::InvalidFileItem(_))));
}

#[tokio::test]
async fn get_text_for_rejects_missing_file() {
    let missing = fixture_root().join("does-not-exist.rq");
    let item = FileItem::new("does-not-exist.rq", missing.to_str().unwrap());
    let result = fixture_loader().get_text_for(&item).await;
    assert!(matches!(result, Err(LoaderError::InvalidFileItem(_))));
}

#[tokio::test]
async fn get_text_for_rejects_directory() {
    let dir = fixture_root().join("queries");
    let item = FileItem::new("queries", dir.to_str().unwrap());
    let result = fixture_loader().get_text_for(&item).await;
    assert!(matches!(result, Err(LoaderError::InvalidFileItem(_))));
}

#[tokio::test]
async fn get_text_for_rejects_path_outside_root() {
    let outside = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
    let item = FileItem::new("Cargo.toml", outside.to_str().unwrap());
    let result = fixture_loader().get_text_for(&item).await;
    assert!(matches!(result, Err(LoaderError::InvalidFileItem(_))));
}

#[tokio::test]
async fn get_text_for_rejects_parent_dir_escape() {
    let sneaky = fixture_root().join("../../Cargo.toml");
    let item = FileItem::new("Cargo.toml", sneaky.to_str().unwrap());
    let result = fixture_loader().get_text_for(&item).await;
    assert!(matches!(result, Err(LoaderError::InvalidFileItem(_))));
}

#[tokio::test]
async fn get_text_for_name_classifies_by_logical_name() {
    let loader = fixture_loader();
    let cases = [
        ("test-rq", QueryType::Sparql),
        ("test-sparql", QueryType::Sparql),
        ("test-tpf", QueryType::Tpf),
        ("test-json", QueryType::Json),
    ];

    for (name, expected) in cases {
        let (text, actual) = loader.get_text_for_name(name).await.unwrap();
        assert_eq!(actual, expected, "query type for {name}");
        assert!(!text.is_empty());
    }
}

#[tokio::test]
async fn get_text_for_name_finds_nested_query() {
    let (text, kind) = fixture_loader()
        .get_text_for_name("describe")
        .await
        .unwrap();
    assert_eq!(kind, QueryType::Sparql);
    assert!(text.contains("DESCRIBE"));
}

#[tokio::test]
async fn get_text_for_name_unknown_is_not_found() {
    let result = fixture_loader().get_text_for_name("no-such-query").await;
    assert!(matches!(result, Err(LoaderError::NotFound(_))));
}

#[tokio::test]
async fn raw_repo_uri_is_empty() {
    assert_eq!(fixture_loader().raw_repo_uri(), "");
    assert_eq!(LocalLoader::new("/definitely/elsewhere").raw_repo_uri(), "");
}

#[tokio::test]
async fn metadata_is_empty() {
    assert!(fixture_loader().metadata().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_root_is_source_unavailable() {
    let loader = LocalLoader::new(fixture_root().join("no-such-dir"));
    let result = loader.fetch_files().await;
    assert!(matches!(result, Err(LoaderError::SourceUnavailable(_))));
}

#[tokio::test]
async fn file_as_root_is_source_unavailable() {
    let loader = LocalLoader::new(fixture_root().join("README.md"));
    let result = loader.fetch_files().await;
    assert!(matches!(result, Err(LoaderError::SourceUnavailable(_))));
}

#[tokio::test]
async fn empty_directory_lists_nothing() {
    let dir = scratch_dir("empty");
    let files = LocalLoader::new(&dir).fetch_files().await.unwrap();
    assert!(files.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn duplicate_names_keep_first_in_walk_order() {
    let dir = scratch_dir("duplicates");
    std::fs::create_dir_all(dir.join("a")).unwrap();
    std::fs::create_dir_all(dir.join("b")).unwrap();
    std::fs::write(dir.join("a/same.rq"), "SELECT ?a {}").unwrap();
    std::fs::write(dir.join("b/same.rq"), "SELECT ?b {}").unwrap();

    let loader = LocalLoader::new(&dir);
    let files = loader.fetch_files().await.unwrap();
    assert_eq!(files.len(), 1);

    let text = loader.get_text_for(&files[0]).await.unwrap();
    assert_eq!(text, "SELECT ?a {}");

    let _ = std::fs::remove_dir_all(&dir);
}
