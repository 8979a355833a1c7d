use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::file_item::FileItem;
use crate::loader::{Loader, LoaderError};
use crate::query_type::QueryType;

/// Loads query files from a directory tree on the local filesystem.
///
/// Each listed item's `download_url` is the file's path under the root.
/// The loader only resolves paths under its own root.
#[derive(Debug, Clone)]
pub struct LocalLoader {
    root: PathBuf,
}

impl LocalLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Walk `root` in file-name order and collect recognized query files.
/// Hidden files and directories are skipped. When two files share a base
/// name, the first in walk order wins.
fn walk(root: &Path) -> Result<Vec<FileItem>, LoaderError> {
    if !root.is_dir() {
        return Err(LoaderError::SourceUnavailable(format!(
            "{} is not a readable directory",
            root.display()
        )));
    }

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(LoaderError::SourceUnavailable(e.to_string()));
            }
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let (Some(name), Some(path)) = (entry.file_name().to_str(), entry.path().to_str()) else {
            continue;
        };

        if QueryType::from_suffix(name).is_none() {
            continue;
        }

        if !seen.insert(name.to_owned()) {
            tracing::warn!("duplicate query file name {name} at {path}; keeping the first");
            continue;
        }

        items.push(FileItem::new(name, path));
    }

    Ok(items)
}

#[async_trait::async_trait]
impl Loader for LocalLoader {
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError> {
        let root = self.root.clone();
        let items = tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| LoaderError::SourceUnavailable(format!("directory walk failed: {e}")))??;

        tracing::debug!("listed {} query files under {}", items.len(), self.root.display());
        Ok(items)
    }

    async fn get_text_for(&self, item: &FileItem) -> Result<String, LoaderError> {
        if item.download_url.is_empty() {
            return Err(LoaderError::InvalidFileItem(format!(
                "{:?} has no download_url",
                item.name
            )));
        }

        let path = Path::new(&item.download_url);
        let inside_root = path
            .strip_prefix(&self.root)
            .is_ok_and(|rel| !rel.components().any(|c| matches!(c, Component::ParentDir)));
        if !inside_root {
            return Err(LoaderError::InvalidFileItem(format!(
                "{} is outside {}",
                path.display(),
                self.root.display()
            )));
        }

        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoaderError::InvalidFileItem(format!("{}: {e}", path.display())))
    }

    fn raw_repo_uri(&self) -> &str {
        ""
    }
}
