//! Background task event processing.

use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::StoreLoaded { result } => handle_store_loaded(app, result),
        AppEvent::SearchCompleted {
            request_id,
            query,
            results,
        } => handle_search_completed(app, request_id, query, results),
    }
}

/// Replace the store on a successful fetch; keep the previous store and
/// tell the user on failure — a dead CMS never takes down the session.
fn handle_store_loaded(
    app: &mut App,
    result: Result<Vec<crate::cms::ArticleSummary>, String>,
) {
    app.loading_store = false;
    match result {
        Ok(articles) => {
            let count = articles.len();
            app.set_store(articles);
            tracing::info!(count, "Article store updated");
            app.set_status(format!("{} artigos carregados", count));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Store fetch failed, keeping previous articles");
            app.set_status("Não foi possível carregar os artigos");
        }
    }
}

/// Deliver a search response to the session.
///
/// The session's request-id check decides whether the response is still
/// current; a stale or dismissed request is dropped here without touching
/// visible state.
fn handle_search_completed(
    app: &mut App,
    request_id: u64,
    query: String,
    results: Vec<crate::cms::ArticleSummary>,
) {
    let count = results.len();
    if app.search.apply(request_id, results) {
        tracing::debug!(request_id, query = %query, count, "Search results applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::cms::{ArticleSummary, CmsClient};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        let cms = CmsClient::new("http://127.0.0.1:9/api", None).unwrap();
        App::new(cms, "https://blog.example.com", Vec::new())
    }

    fn article(id: &str) -> ArticleSummary {
        ArticleSummary {
            id: Arc::from(id),
            slug: Arc::from(id),
            title: Arc::from(id),
            description: None,
            category: None,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_store_loaded_replaces_articles() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::StoreLoaded {
                result: Ok(vec![article("1"), article("2")]),
            },
        );
        assert_eq!(app.articles.len(), 2);
        assert_eq!(app.visible.len(), 2);
        assert!(!app.loading_store);
    }

    #[tokio::test]
    async fn test_store_load_failure_keeps_previous_store() {
        let mut app = test_app();
        app.set_store(vec![article("1")]);

        handle_app_event(
            &mut app,
            AppEvent::StoreLoaded {
                result: Err("boom".to_string()),
            },
        );
        assert_eq!(app.articles.len(), 1);
        assert!(app.status_message.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_response_is_dropped() {
        let mut app = test_app();
        app.open_search();

        app.search.input("foo".to_string());
        time::advance(Duration::from_millis(301)).await;
        let r1 = app.search.poll_deadline().unwrap();

        app.search.input("foobar".to_string());
        time::advance(Duration::from_millis(301)).await;
        let r2 = app.search.poll_deadline().unwrap();

        // R2 arrives first, then the slow R1
        handle_app_event(
            &mut app,
            AppEvent::SearchCompleted {
                request_id: r2.id,
                query: "foobar".to_string(),
                results: vec![article("foobar-hit")],
            },
        );
        handle_app_event(
            &mut app,
            AppEvent::SearchCompleted {
                request_id: r1.id,
                query: "foo".to_string(),
                results: vec![article("foo-hit")],
            },
        );

        assert_eq!(app.search.results.len(), 1);
        assert_eq!(&*app.search.results[0].id, "foobar-hit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_close_is_dropped() {
        let mut app = test_app();
        app.open_search();
        app.search.input("foo".to_string());
        time::advance(Duration::from_millis(301)).await;
        let req = app.search.poll_deadline().unwrap();

        app.close_search();
        handle_app_event(
            &mut app,
            AppEvent::SearchCompleted {
                request_id: req.id,
                query: "foo".to_string(),
                results: vec![article("hit")],
            },
        );
        assert!(app.search.results.is_empty());
    }
}
