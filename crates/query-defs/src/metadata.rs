use serde::Serialize;

/// Descriptive information a source publishes about itself.
///
/// Every field is optional: a local directory has none of them, a GitHub
/// repository fills in what the API reports, and a manifest carries
/// whatever its author wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_url: Option<String>,
    pub licence_url: Option<String>,
}

impl SourceMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
