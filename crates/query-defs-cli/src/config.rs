use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl AppConfig {
    /// Find an enabled source by label.
    pub fn find(&self, label: &str) -> Option<&SourceEntry> {
        self.sources
            .iter()
            .find(|entry| entry.enabled && entry.label == label)
    }

    /// First enabled source, used when none is named.
    pub fn first_enabled(&self) -> Option<&SourceEntry> {
        self.sources.iter().find(|entry| entry.enabled)
    }
}

/// A single named source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceEntry {
    pub label: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub source_type: SourceType,
}

/// Where a source's query files live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum SourceType {
    /// A directory on this machine.
    #[serde(rename = "local")]
    Local { path: PathBuf },

    /// A GitHub repository, optionally narrowed to a subdirectory and pinned to a ref.
    #[serde(rename = "github-repo")]
    GitHubRepo {
        owner: String,
        repo: String,
        subdir: Option<String>,
        #[serde(rename = "ref")]
        git_ref: Option<String>,
    },

    /// A remote manifest listing query URLs.
    #[serde(rename = "url")]
    Url { manifest_url: String },
}

fn default_true() -> bool {
    true
}

/// Config file path: `~/.config/query-defs/sources.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("query-defs").join("sources.toml"))
}

/// Load config from file. A missing file means no named sources; a
/// malformed one is reported and ignored.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("failed to parse config at {}: {e}", path.display()),
        }
    }

    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_local_from_toml() {
        let toml_str = r#"
[[sources]]
label = "checkout"
type = "local"
path = "/srv/queries"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(
            config.sources[0].source_type,
            SourceType::Local {
                path: PathBuf::from("/srv/queries")
            }
        );
    }

    #[test]
    fn parse_repo_from_toml() {
        let toml_str = r#"
[[sources]]
label = "bands"
type = "github-repo"
owner = "user"
repo = "repo"
subdir = "queries"
ref = "v1.0"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sources[0].label, "bands");
        assert!(config.sources[0].enabled);
        match &config.sources[0].source_type {
            SourceType::GitHubRepo {
                owner,
                repo,
                subdir,
                git_ref,
            } => {
                assert_eq!(owner, "user");
                assert_eq!(repo, "repo");
                assert_eq!(subdir.as_deref(), Some("queries"));
                assert_eq!(git_ref.as_deref(), Some("v1.0"));
            }
            _ => panic!("expected GitHubRepo"),
        }
    }

    #[test]
    fn repo_ref_and_subdir_are_optional() {
        let toml_str = r#"
[[sources]]
label = "bands"
type = "github-repo"
owner = "user"
repo = "repo"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        match &config.sources[0].source_type {
            SourceType::GitHubRepo {
                subdir, git_ref, ..
            } => {
                assert_eq!(*subdir, None);
                assert_eq!(*git_ref, None);
            }
            _ => panic!("expected GitHubRepo"),
        }
    }

    #[test]
    fn parse_url_from_toml() {
        let toml_str = r#"
[[sources]]
label = "bands-api"
type = "url"
manifest_url = "http://example.org/url.yml"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.sources[0].source_type,
            SourceType::Url {
                manifest_url: "http://example.org/url.yml".into()
            }
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let toml_str = r#"
[[sources]]
label = "gist"
type = "github-gist"
gist_id = "abc"
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn disabled_sources_are_not_found() {
        let toml_str = r#"
[[sources]]
label = "off"
type = "local"
path = "/tmp/off"
enabled = false

[[sources]]
label = "on"
type = "local"
path = "/tmp/on"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.find("off").is_none());
        assert_eq!(config.find("on").map(|e| e.label.as_str()), Some("on"));
        assert_eq!(config.first_enabled().map(|e| e.label.as_str()), Some("on"));
    }

    #[test]
    fn empty_config_has_no_sources() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.sources.is_empty());
        assert!(config.first_enabled().is_none());
    }
}
