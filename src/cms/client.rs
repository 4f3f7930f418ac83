use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use super::types::{ArticleDoc, ArticleSummary, CmsError};

/// Thin client for the headless CMS content API.
///
/// Constructed once in `main` from configuration and passed down — nothing
/// in the crate builds its own client, which keeps every consumer testable
/// against a mock server.
///
/// Cheap to clone: the inner `reqwest::Client` is a handle around a shared
/// connection pool.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    api_url: Url,
    access_token: Option<SecretString>,
}

impl CmsClient {
    /// Build a client for the given API endpoint.
    ///
    /// The endpoint must be an absolute http(s) URL (HTTPS enforced outside
    /// loopback). The access token, when present, is sent as a bearer header
    /// on every request.
    pub fn new(api_url: &str, access_token: Option<SecretString>) -> Result<Self, CmsError> {
        let api_url = crate::util::validate_endpoint(api_url)
            .map_err(|e| CmsError::InvalidEndpoint(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(Policy::limited(3))
            .build()?;

        Ok(Self {
            http,
            api_url,
            access_token,
        })
    }

    /// Join a path segment onto the API base, tolerating a base with or
    /// without a trailing slash. The base is always an absolute http(s) URL
    /// (validated in `new`), so it can carry path segments.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url
    }

    /// Fetch every published article summary.
    ///
    /// The API materializes pagination server-side, so one request returns
    /// the whole store. Documents that fail to parse individually do not
    /// exist at this layer — the response either decodes as a JSON array of
    /// documents or the call fails with [`CmsError::Decode`].
    pub async fn fetch_all_articles(&self) -> Result<Vec<ArticleSummary>, CmsError> {
        let url = self.endpoint("documents");
        tracing::debug!(url = %url, "Fetching article store");

        let mut request = self.http.get(url).query(&[("type", "post")]);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::HttpStatus(status.as_u16()));
        }

        let docs: Vec<ArticleDoc> = response
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))?;

        let articles: Vec<ArticleSummary> =
            docs.into_iter().map(ArticleDoc::into_summary).collect();
        tracing::debug!(count = articles.len(), "Article store fetched");
        Ok(articles)
    }
}
