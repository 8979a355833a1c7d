use std::sync::Arc;

use crate::file_item::FileItem;
use crate::metadata::SourceMetadata;
use crate::query_type::{self, QueryType};

/// Errors that can occur when interacting with a query source.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The directory, repository, or manifest could not be listed at all.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// A file item is malformed or its content could not be fetched.
    #[error("invalid file item: {0}")]
    InvalidFileItem(String),

    #[error("no query named {0}")]
    NotFound(String),

    #[error("unrecognized query type: {0}")]
    UnrecognizedQueryType(String),
}

/// A source of query definition files.
///
/// Loaders know how to list and read query files from one origin (a local
/// directory, a GitHub repository, a remote manifest). Configuration is
/// fixed at construction; every call re-queries the origin.
#[async_trait::async_trait]
pub trait Loader: Send + Sync {
    /// List the query files in this source.
    ///
    /// Files whose suffix is not a known query type are left out. An
    /// unreachable source is an error, never an empty list.
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError>;

    /// Read the full text addressed by `item.download_url`.
    async fn get_text_for(&self, item: &FileItem) -> Result<String, LoaderError>;

    /// Find the listed item a logical name refers to.
    ///
    /// `name` matches an item whose name equals it or whose name minus the
    /// query suffix equals it, so `foo` finds `foo.rq`. The first match in
    /// listing order wins.
    async fn find_file(&self, name: &str) -> Result<FileItem, LoaderError> {
        self.fetch_files()
            .await?
            .into_iter()
            .find(|item| item.matches_name(name))
            .ok_or_else(|| LoaderError::NotFound(name.to_owned()))
    }

    /// Look up a query by logical name and return its text and type.
    async fn get_text_for_name(&self, name: &str) -> Result<(String, QueryType), LoaderError> {
        let item = self.find_file(name).await?;
        let text = self.get_text_for(&item).await?;
        let kind = query_type::classify(&item.name, Some(&text))?;
        Ok((text, kind))
    }

    /// Provenance base for links back to the originals.
    ///
    /// Constant for the lifetime of the loader. Empty when the source has
    /// no externally resolvable location.
    fn raw_repo_uri(&self) -> &str;

    /// Descriptive metadata the source publishes about itself.
    /// Default implementation reports nothing.
    async fn metadata(&self) -> Result<SourceMetadata, LoaderError> {
        Ok(SourceMetadata::default())
    }
}

#[async_trait::async_trait]
impl<T: Loader + ?Sized> Loader for Arc<T> {
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError> {
        (**self).fetch_files().await
    }

    async fn get_text_for(&self, item: &FileItem) -> Result<String, LoaderError> {
        (**self).get_text_for(item).await
    }

    async fn find_file(&self, name: &str) -> Result<FileItem, LoaderError> {
        (**self).find_file(name).await
    }

    async fn get_text_for_name(&self, name: &str) -> Result<(String, QueryType), LoaderError> {
        (**self).get_text_for_name(name).await
    }

    fn raw_repo_uri(&self) -> &str {
        (**self).raw_repo_uri()
    }

    async fn metadata(&self) -> Result<SourceMetadata, LoaderError> {
        (**self).metadata().await
    }
}
