pub mod github;
pub mod http;
pub mod manifest;
pub mod repo;
pub mod tree;
pub mod url_loader;

pub use github::{GithubLoader, GithubLoaderConfig};
pub use http::{FetchError, HttpFetcher};
pub use manifest::{Manifest, ManifestEntry};
pub use url_loader::UrlLoader;
