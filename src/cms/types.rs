use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the CMS HTTP boundary.
///
/// These never escape the application edge as failures: callers either
/// propagate them into a status-line message or fold them into an empty
/// result set (search).
#[derive(Debug, Error)]
pub enum CmsError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(String),
    /// Configured API endpoint is not a usable URL
    #[error("Invalid API endpoint: {0}")]
    InvalidEndpoint(String),
}

// ============================================================================
// Domain Types
// ============================================================================

/// Minimal projection of a CMS document used for listing and search.
///
/// Immutable once fetched — the store is replaced wholesale on refresh,
/// never edited in place. String fields use `Arc<str>` so clones into
/// derived views, search results and app events are refcount bumps.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSummary {
    pub id: Arc<str>,
    /// Route segment under the site root. May be empty for unpublished drafts;
    /// empty slugs are skipped by navigation and the sitemap.
    pub slug: Arc<str>,
    pub title: Arc<str>,
    pub description: Option<Arc<str>>,
    /// Topic slug, or `None` for uncategorized articles.
    pub category: Option<Arc<str>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// A named category from the site configuration.
///
/// Topics are static per deployment: they drive the chip row and the
/// navigation menu, and their slugs are the foreign keys articles point at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    pub id: String,
    pub slug: String,
    pub title: String,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Raw article document as returned by the CMS API.
///
/// Every field except `id` is optional: the CMS omits empty rich-text fields
/// and drafts have no slug. Converts to [`ArticleSummary`] via
/// `into_summary()` with `Arc` wrapping and date parsing.
#[derive(Debug, Deserialize)]
pub(crate) struct ArticleDoc {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl ArticleDoc {
    pub(crate) fn into_summary(self) -> ArticleSummary {
        let published_at = self.published_at.as_deref().and_then(parse_published);
        ArticleSummary {
            id: Arc::from(self.id),
            slug: Arc::from(self.slug.unwrap_or_default()),
            title: Arc::from(self.title.unwrap_or_default()),
            description: self.description.filter(|d| !d.is_empty()).map(Arc::from),
            category: self.category.filter(|c| !c.is_empty()).map(Arc::from),
            published_at,
        }
    }
}

/// Parse a CMS timestamp, which is either RFC 3339 or a bare `YYYY-MM-DD`
/// date (date fields have no time component). Unparseable values are dropped
/// with a log rather than failing the whole document.
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    tracing::debug!(raw, "Dropping unparseable publication date");
    None
}
