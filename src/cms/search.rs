use super::client::CmsClient;
use super::types::ArticleSummary;
use crate::search::MAX_RESULTS;

/// Case-insensitive substring match over title and description, capped at
/// [`MAX_RESULTS`]. Store order is preserved — the session displays results
/// exactly as the backend hands them over, without re-ranking.
///
/// This is the deterministic search contract: a result matches iff the
/// trimmed, lowercased query occurs in its lowercased title or description.
pub fn filter_articles(store: &[ArticleSummary], query: &str) -> Vec<ArticleSummary> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    store
        .iter()
        .filter(|article| {
            article.title.to_lowercase().contains(&term)
                || article
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        })
        .take(MAX_RESULTS)
        .cloned()
        .collect()
}

impl CmsClient {
    /// Search the blog for `query`.
    ///
    /// Fetches the store and applies [`filter_articles`]. A collaborator
    /// failure is logged and folded into an empty result set — search never
    /// propagates an error; the worst the user sees is "no results".
    pub async fn search(&self, query: &str) -> Vec<ArticleSummary> {
        match self.fetch_all_articles().await {
            Ok(store) => filter_articles(&store, query),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Search backend unavailable, returning no results");
                Vec::new()
            }
        }
    }
}
