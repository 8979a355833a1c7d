use serde::Deserialize;

/// Response from GitHub's repository API.
/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub owner: RepoOwner,
    /// Licence GitHub detected in the repository, if any.
    pub license: Option<RepoLicense>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoLicense {
    pub key: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    pub html_url: String,
}

/// Response from GitHub's commit API, trimmed to the commit SHA.
/// `GET /repos/{owner}/{repo}/commits/{ref}`
#[derive(Debug, Deserialize)]
pub struct CommitResponse {
    pub sha: String,
}
