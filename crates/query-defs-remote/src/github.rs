use std::collections::HashSet;

use query_defs::{FileItem, Loader, LoaderError, QueryType, SourceMetadata};
use reqwest::Url;

use crate::http::{FetchError, HttpFetcher};
use crate::repo::{CommitResponse, RepoResponse};
use crate::tree::{TreeEntry, TreeResponse, is_hidden_path};

/// Configuration for a GitHub repository loader.
#[derive(Debug, Clone)]
pub struct GithubLoaderConfig {
    pub owner: String,
    pub repo: String,
    /// Only list files under this directory.
    pub subdir: Option<String>,
    /// Branch, tag or commit. When unset, the default branch's head commit
    /// is resolved once on connect and pinned.
    pub git_ref: Option<String>,
    pub api_base_url: Option<String>,
    pub raw_base_url: Option<String>,
}

impl GithubLoaderConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            subdir: None,
            git_ref: None,
            api_base_url: None,
            raw_base_url: None,
        }
    }

    pub fn with_subdir(mut self, subdir: Option<String>) -> Self {
        self.subdir = subdir;
        self
    }

    pub fn with_ref(mut self, git_ref: Option<String>) -> Self {
        self.git_ref = git_ref;
        self
    }
}

/// Loads query files from a GitHub repository at a fixed ref.
///
/// File text is read from the raw-content host, so `download_url`s are
/// plain HTTP URLs.
#[derive(Debug)]
pub struct GithubLoader {
    config: GithubLoaderConfig,
    repo_info: RepoResponse,
    git_ref: String,
    raw_root: Url,
    raw_repo_uri: String,
    http: HttpFetcher,
}

fn unavailable(context: &str, err: FetchError) -> LoaderError {
    LoaderError::SourceUnavailable(format!("{context}: {err}"))
}

/// Append the `/`-separated `path` to `base`, escaping each segment.
///
/// A trailing `/` in `path` keeps a trailing `/` in the result.
fn push_path(base: &Url, path: &str) -> Result<Url, LoaderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| LoaderError::SourceUnavailable(format!("{base} cannot take a path")))?
        .pop_if_empty()
        .extend(path.split('/'));
    Ok(url)
}

impl GithubLoader {
    /// Look up the repository and pin the ref this loader will read from.
    ///
    /// A missing repository is `SourceUnavailable`.
    pub async fn connect(config: GithubLoaderConfig) -> Result<Self, LoaderError> {
        let http = HttpFetcher::new();
        let api_base = config
            .api_base_url
            .as_deref()
            .unwrap_or("https://api.github.com");

        let repo_url = format!("{api_base}/repos/{}/{}", config.owner, config.repo);
        let repo_info: RepoResponse = http.get_json(&repo_url).await.map_err(|e| {
            if e.is_not_found() {
                LoaderError::SourceUnavailable(format!(
                    "repository {}/{} not found",
                    config.owner, config.repo
                ))
            } else {
                unavailable("repository lookup failed", e)
            }
        })?;

        let git_ref = match &config.git_ref {
            Some(r) => r.clone(),
            None => {
                let commit_url = format!(
                    "{api_base}/repos/{}/{}/commits/{}",
                    config.owner, config.repo, repo_info.default_branch
                );
                let commit: CommitResponse = http
                    .get_json(&commit_url)
                    .await
                    .map_err(|e| unavailable("default branch lookup failed", e))?;
                tracing::debug!(
                    "pinned {}/{} default branch {} at {}",
                    config.owner,
                    config.repo,
                    repo_info.default_branch,
                    commit.sha
                );
                commit.sha
            }
        };

        let raw_base = config
            .raw_base_url
            .as_deref()
            .unwrap_or("https://raw.githubusercontent.com");
        let raw_base = Url::parse(raw_base).map_err(|e| {
            LoaderError::SourceUnavailable(format!("invalid raw content URL {raw_base}: {e}"))
        })?;
        let raw_root = push_path(
            &raw_base,
            &format!("{}/{}/{git_ref}/", config.owner, config.repo),
        )?;
        let raw_repo_uri = raw_root.to_string();

        Ok(Self {
            config,
            repo_info,
            git_ref,
            raw_root,
            raw_repo_uri,
            http,
        })
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or("https://api.github.com")
    }

    /// The ref every request is made against; a commit SHA when none was configured.
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    /// Human-facing repository page, e.g. `https://github.com/owner/repo`.
    pub fn repo_uri(&self) -> &str {
        &self.repo_info.html_url
    }

    /// `subdir` with a trailing slash, or `None` when listing the whole repo.
    fn subdir_prefix(&self) -> Option<String> {
        self.config
            .subdir
            .as_deref()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(|s| format!("{s}/"))
    }

    async fn fetch_tree(&self) -> Result<TreeResponse, LoaderError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base(),
            self.config.owner,
            self.config.repo,
            self.git_ref,
        );

        let tree: TreeResponse = self.http.get_json(&url).await.map_err(|e| {
            if e.is_not_found() {
                LoaderError::SourceUnavailable(format!(
                    "ref {} not found in {}/{}",
                    self.git_ref, self.config.owner, self.config.repo
                ))
            } else {
                unavailable("repository listing failed", e)
            }
        })?;

        if tree.truncated {
            tracing::warn!(
                "tree response for {}/{} was truncated; results may be incomplete",
                self.config.owner,
                self.config.repo
            );
        }

        Ok(tree)
    }

    /// Query files in `tree`, restricted to the configured subdirectory.
    fn file_items(&self, tree: &TreeResponse) -> Result<Vec<FileItem>, LoaderError> {
        let prefix = self.subdir_prefix();

        if let Some(prefix) = &prefix {
            let dir = prefix.trim_end_matches('/');
            if !tree.tree.iter().any(|e| e.is_tree() && e.path == dir) {
                return Err(LoaderError::SourceUnavailable(format!(
                    "{}/{} has no directory {dir} at {}",
                    self.config.owner, self.config.repo, self.git_ref
                )));
            }
        }

        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for entry in tree.tree.iter().filter(|e| e.is_blob()) {
            let relative = match &prefix {
                Some(prefix) => match entry.path.strip_prefix(prefix.as_str()) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => entry.path.as_str(),
            };
            // Only segments below the configured subdir count as hidden.
            if is_hidden_path(relative) {
                continue;
            }

            let name = entry.file_name();
            if QueryType::from_suffix(name).is_none() {
                continue;
            }
            if !seen.insert(name) {
                tracing::warn!(
                    "duplicate query file name {name} at {}; keeping the first",
                    entry.path
                );
                continue;
            }

            items.push(FileItem::new(name, self.raw_url_for(entry)?));
        }

        Ok(items)
    }

    fn raw_url_for(&self, entry: &TreeEntry) -> Result<String, LoaderError> {
        Ok(push_path(&self.raw_root, &entry.path)?.to_string())
    }

    /// Browser link for the licence GitHub detected on the repository.
    ///
    /// Points at the licence file at the repository root when the tree has
    /// one, otherwise at GitHub's description of the detected licence.
    async fn licence_url(&self) -> Result<Option<String>, LoaderError> {
        let Some(license) = &self.repo_info.license else {
            return Ok(None);
        };

        let tree = self.fetch_tree().await?;
        let file = tree
            .tree
            .iter()
            .filter(|e| e.is_blob() && !e.path.contains('/'))
            .find(|e| {
                let upper = e.path.to_uppercase();
                upper.starts_with("LICENSE") || upper.starts_with("LICENCE")
            });

        Ok(match file {
            Some(e) => Some(format!(
                "{}/blob/{}/{}",
                self.repo_info.html_url, self.git_ref, e.path
            )),
            None => license.url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Loader for GithubLoader {
    async fn fetch_files(&self) -> Result<Vec<FileItem>, LoaderError> {
        let tree = self.fetch_tree().await?;
        let items = self.file_items(&tree)?;
        tracing::debug!(
            "listed {} query files in {}/{} at {}",
            items.len(),
            self.config.owner,
            self.config.repo,
            self.git_ref
        );
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
        &self.raw_repo_uri
    }

    async fn metadata(&self) -> Result<SourceMetadata, LoaderError> {
        Ok(SourceMetadata {
            title: Some(self.repo_info.full_name.clone()),
            description: self.repo_info.description.clone(),
            contact_name: Some(self.repo_info.owner.login.clone()),
            contact_url: Some(self.repo_info.owner.html_url.clone()),
            licence_url: self.licence_url().await?,
        })
    }
}
