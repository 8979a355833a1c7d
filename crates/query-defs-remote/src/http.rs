use std::time::Duration;

use serde::de::DeserializeOwned;

const USER_AGENT: &str = "query-defs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a single HTTP GET.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}

/// Thin GET-only transport shared by the remote loaders.
///
/// Every request carries a fixed `User-Agent` and a bounded timeout. Only
/// 2xx responses count as success; a body that fails to read in full is an
/// error rather than a short string.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: response.status(),
            });
        }

        Ok(response)
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {url}");
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_owned(),
                source,
            })
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!("GET {url} (json)");
        self.get(url)
            .await?
            .json()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/q.rq"))
            .and(header("User-Agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("SELECT * {}"))
            .mount(&server)
            .await;

        let text = HttpFetcher::new()
            .get_text(&format!("{}/q.rq", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "SELECT * {}");
    }

    #[tokio::test]
    async fn not_found_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .get_text(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn server_error_is_not_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .get_text(&format!("{}/broken", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_url_is_request_error() {
        let err = HttpFetcher::new().get_text("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[tokio::test]
    async fn get_json_rejects_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result: Result<Vec<String>, _> = HttpFetcher::new()
            .get_json(&format!("{}/data", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::Body { .. })));
    }
}
