use crate::{FileItem, Loader, LoaderError};

/// In-memory loader for testing. Keeps files in insertion order.
pub struct InMemoryLoader {
    uri: String,
    files: Vec<(FileItem, String)>,
}

impl InMemoryLoader {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            files: Vec::new(),
        }
    }

    /// Add a file. Its `download_url` is `memory://<name>`.
    pub fn add(&mut self, name: &str, text: &str) {
        let item = FileItem::new(name, format!("memory://{name}"));
        self.files.push((item, text.to_owned()));
    }
}

#[async_trait::async_trait]
impl Loader for InMemoryLoader {
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError> {
        Ok(self
            .files
            .iter()
            .filter(|(item, _)| item.query_type().is_some())
            .map(|(item, _)| item.clone())
            .collect())
    }

    async fn get_text_for(&self, item: &FileItem) -> Result<String, LoaderError> {
        if item.download_url.is_empty() {
            return Err(LoaderError::InvalidFileItem("no download_url".into()));
        }
        self.files
            .iter()
            .find(|(known, _)| known.download_url == item.download_url)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| LoaderError::InvalidFileItem(item.download_url.clone()))
    }

    fn raw_repo_uri(&self) -> &str {
        &self.uri
    }
}
