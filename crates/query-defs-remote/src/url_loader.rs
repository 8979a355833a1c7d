use query_defs::{FileItem, Loader, LoaderError, SourceMetadata};
use reqwest::Url;

use crate::http::HttpFetcher;
use crate::manifest::Manifest;

/// Loads query files listed in a remote manifest.
///
/// The manifest is fetched again on every listing; only its URL is fixed.
#[derive(Debug, Clone)]
pub struct UrlLoader {
    manifest_url: String,
    http: HttpFetcher,
}

impl UrlLoader {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            http: HttpFetcher::new(),
        }
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    fn base_url(&self) -> Result<Url, LoaderError> {
        Url::parse(&self.manifest_url).map_err(|e| {
            LoaderError::SourceUnavailable(format!("invalid manifest URL {}: {e}", self.manifest_url))
        })
    }

    /// Fetch and parse the manifest.
    pub async fn manifest(&self) -> Result<Manifest, LoaderError> {
        let text = self
            .http
            .get_text(&self.manifest_url)
            .await
            .map_err(|e| LoaderError::SourceUnavailable(e.to_string()))?;

        Manifest::parse(&text).map_err(|e| {
            LoaderError::SourceUnavailable(format!(
                "could not parse manifest {}: {e}",
                self.manifest_url
            ))
        })
    }
}

#[async_trait::async_trait]
impl Loader for UrlLoader {
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError> {
        let base = self.base_url()?;
        let items = self.manifest().await?.file_items(&base);
        tracing::debug!("listed {} query files from {}", items.len(), self.manifest_url);
        Ok(items)
    }

    async fn get_text_for(&self, item: &FileItem) -> Result<String, LoaderError> {
        if item.download_url.is_empty() {
            return Err(LoaderError::InvalidFileItem(format!(
                "{:?} has no download_url",
                item.name
            )));
        }

        self.http
            .get_text(&item.download_url)
            .await
            .map_err(|e| LoaderError::InvalidFileItem(e.to_string()))
    }

    fn raw_repo_uri(&self) -> &str {
        &self.manifest_url
    }

    async fn metadata(&self) -> Result<SourceMetadata, LoaderError> {
        Ok(self.manifest().await?.metadata())
    }
}
