use std::collections::HashSet;

use percent_encoding::percent_decode_str;
use query_defs::{FileItem, QueryType, SourceMetadata};
use reqwest::Url;
use serde::Deserialize;

/// A remote document listing the query files of an API.
///
/// ```yaml
/// title: Band API
/// description: Queries over DBpedia bands
/// contact:
///   name: Jane Doe
///   url: https://example.org/~jane
/// licence: https://example.org/LICENSE
/// queries:
///   - https://example.org/queries/bands.rq
///   - name: members.sparql
///     download_url: queries/members.sparql
/// ```
///
/// JSON documents with the same shape parse as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact: Option<Contact>,
    #[serde(alias = "license")]
    pub licence: Option<String>,
    #[serde(default)]
    pub queries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// One member of a manifest: a bare URL, or an explicit name and URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Url(String),
    Named { name: String, download_url: String },
}

impl ManifestEntry {
    fn raw_url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Named { download_url, .. } => download_url,
        }
    }
}

/// Last non-empty path segment of a URL, percent-decoded.
fn url_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(text)
    }

    /// Resolve entries into file items.
    ///
    /// Relative URLs resolve against `base` (the manifest's own URL).
    /// Entries that are not query files, or whose URL does not resolve, are
    /// skipped. Later entries reusing an earlier name are dropped.
    pub fn file_items(&self, base: &Url) -> Vec<FileItem> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for entry in &self.queries {
            let url = match base.join(entry.raw_url()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("skipping manifest entry {}: {e}", entry.raw_url());
                    continue;
                }
            };

            let name = match entry {
                ManifestEntry::Named { name, .. } => Some(name.clone()),
                ManifestEntry::Url(_) => url_file_name(&url),
            };
            let Some(name) = name else {
                continue;
            };

            if QueryType::from_suffix(&name).is_none() {
                continue;
            }
            if !seen.insert(name.clone()) {
                tracing::warn!("duplicate query file name {name} in manifest; keeping the first");
                continue;
            }

            items.push(FileItem::new(name, url.to_string()));
        }

        items
    }

    pub fn metadata(&self) -> SourceMetadata {
        let contact = self.contact.clone().unwrap_or_default();
        SourceMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            contact_name: contact.name,
            contact_url: contact.url,
            licence_url: self.licence.clone(),
        }
    }
}
