use serde::Serialize;

use crate::query_type::{self, QueryType};

/// One retrievable file from a loader listing.
///
/// `download_url` is opaque to callers: only the loader that produced the
/// item knows how to resolve it. An item with an empty `download_url` (such
/// as `FileItem::default()`) is never produced by a listing and is rejected
/// by `get_text_for`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FileItem {
    /// Base name including extension, unique within one listing.
    pub name: String,
    pub download_url: String,
}

impl FileItem {
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
        }
    }

    /// The name with its query suffix stripped (`foo.rq` -> `foo`).
    pub fn base_name(&self) -> &str {
        query_type::base_name(&self.name)
    }

    /// True if `name` refers to this item, either exactly or by base name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.base_name() == name
    }

    /// Query type implied by the file suffix alone.
    pub fn query_type(&self) -> Option<QueryType> {
        QueryType::from_suffix(&self.name)
    }
}
