use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;

use crate::cms::{ArticleSummary, CmsClient, Topic};
use crate::listing::{self, SortMode, TopicSection, ViewState};
use crate::search::SearchSession;

// ============================================================================
// Surface State Machines
// ============================================================================

/// Navigation menu surface: closed or open. Kept as an explicit state
/// machine (not a bool) so transitions are named at call sites and a third
/// state can be added without auditing every flag read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn toggle(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }
}

/// Search surface: closed or open. Independent from the session state —
/// the surface is the overlay, the session is the query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSurface {
    #[default]
    Closed,
    Open,
}

impl SearchSurface {
    pub fn is_open(self) -> bool {
        self == SearchSurface::Open
    }
}

// ============================================================================
// Background Task Events
// ============================================================================

/// Events from background tasks, delivered over the app's mpsc channel.
pub enum AppEvent {
    /// Article store fetched (startup or manual refresh). The error carries
    /// a display string — the fetch failure was already logged at source.
    StoreLoaded {
        result: Result<Vec<ArticleSummary>, String>,
    },
    /// Search request answered. Collaborator failures were folded into an
    /// empty result set by the task; the session decides whether the
    /// response is still current via `request_id`.
    SearchCompleted {
        request_id: u64,
        query: String,
        results: Vec<ArticleSummary>,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// The article store (`articles`) is immutable once set: refresh replaces
/// the whole `Arc`, and everything the user sees — the visible listing,
/// chip counts, menu sections — is derived from it plus `view_state` by
/// pure functions in `listing`.
pub struct App {
    pub cms: CmsClient,

    /// Public site root for navigation targets.
    pub site_url: Arc<str>,

    // Data
    /// The article store. `Arc` so background tasks and derived views share
    /// it without copying; replaced wholesale by `set_store`.
    pub articles: Arc<Vec<ArticleSummary>>,
    /// Configured topic taxonomy, in chip/menu display order.
    pub topics: Arc<Vec<Topic>>,

    // Derived listing state (recomputed by `refresh_derived`)
    pub view_state: ViewState,
    /// Articles visible under the current category and sort order.
    pub visible: Vec<ArticleSummary>,
    /// Article count per category slug, uncategorized bucket included.
    pub counts: HashMap<Arc<str>, usize>,
    /// Store grouped under each topic, for the navigation menu.
    pub menu_sections: Vec<TopicSection>,

    // UI state
    pub selected_article: usize,
    pub menu: MenuState,
    /// Flattened index into the menu's articles (across sections).
    pub menu_selected: usize,
    pub search_surface: SearchSurface,
    pub search: SearchSession,
    /// True while the store fetch is in flight.
    pub loading_store: bool,

    /// Status message with its creation instant; expires after 3 seconds.
    /// `Cow` avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(cms: CmsClient, site_url: &str, topics: Vec<Topic>) -> Self {
        let mut app = Self {
            cms,
            site_url: Arc::from(site_url.trim_end_matches('/')),
            articles: Arc::new(Vec::new()),
            topics: Arc::new(topics),
            view_state: ViewState::default(),
            visible: Vec::new(),
            counts: HashMap::new(),
            menu_sections: Vec::new(),
            selected_article: 0,
            menu: MenuState::Closed,
            menu_selected: 0,
            search_surface: SearchSurface::Closed,
            search: SearchSession::new(),
            loading_store: false,
            status_message: None,
            needs_redraw: true,
        };
        app.refresh_derived();
        app
    }

    // ------------------------------------------------------------------
    // Store
    // ------------------------------------------------------------------

    /// Replace the article store and recompute everything derived from it.
    pub fn set_store(&mut self, articles: Vec<ArticleSummary>) {
        self.articles = Arc::new(articles);
        self.refresh_derived();
    }

    /// Recompute the visible listing, chip counts and menu sections.
    ///
    /// Called on every store or view-state change; synchronous, so category
    /// and sort transitions are immediately consistent.
    fn refresh_derived(&mut self) {
        self.visible = listing::view(
            &self.articles,
            self.view_state.active_category.as_deref(),
            self.view_state.sort_mode,
        );
        self.counts = listing::counts_by_category(&self.articles);
        self.menu_sections = listing::topics_with_articles(&self.topics, &self.articles);
        self.clamp_selections();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // View state transitions
    // ------------------------------------------------------------------

    /// Activate a category chip (`None` = "Todos").
    pub fn set_category(&mut self, slug: Option<Arc<str>>) {
        self.view_state.active_category = slug;
        self.selected_article = 0;
        self.refresh_derived();
    }

    /// Move the active chip left/right through [Todos, topics...].
    pub fn cycle_category(&mut self, delta: isize) {
        let chips = self.topics.len() + 1; // "Todos" plus each topic
        let current = match &self.view_state.active_category {
            None => 0,
            Some(slug) => self
                .topics
                .iter()
                .position(|t| t.slug.as_str() == &**slug)
                .map(|i| i + 1)
                .unwrap_or(0),
        };
        let next = (current as isize + delta).rem_euclid(chips as isize) as usize;
        let slug = if next == 0 {
            None
        } else {
            Some(Arc::from(self.topics[next - 1].slug.as_str()))
        };
        self.set_category(slug);
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.view_state.sort_mode = mode;
        self.refresh_derived();
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.view_state.sort_mode.next());
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Clamp selection indices after any list mutation.
    pub fn clamp_selections(&mut self) {
        self.selected_article = if self.visible.is_empty() {
            0
        } else {
            self.selected_article
                .min(self.visible.len().saturating_sub(1))
        };
        let menu_len = self.menu_article_count();
        self.menu_selected = if menu_len == 0 {
            0
        } else {
            self.menu_selected.min(menu_len - 1)
        };
    }

    /// Currently highlighted article in the listing (bounds-checked).
    pub fn selected_article(&self) -> Option<&ArticleSummary> {
        self.visible.get(self.selected_article)
    }

    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        if !self.visible.is_empty() {
            let max = self.visible.len() - 1;
            self.selected_article = self.selected_article.saturating_add(1).min(max);
        }
    }

    // ------------------------------------------------------------------
    // Menu surface
    // ------------------------------------------------------------------

    pub fn toggle_menu(&mut self) {
        self.menu = self.menu.toggle();
        self.menu_selected = 0;
        self.needs_redraw = true;
    }

    pub fn close_menu(&mut self) {
        self.menu = MenuState::Closed;
        self.needs_redraw = true;
    }

    /// Total navigable articles across all menu sections.
    pub fn menu_article_count(&self) -> usize {
        self.menu_sections.iter().map(|s| s.articles.len()).sum()
    }

    /// Resolve the flattened menu selection to its article.
    pub fn selected_menu_article(&self) -> Option<&ArticleSummary> {
        let mut index = self.menu_selected;
        for section in &self.menu_sections {
            if index < section.articles.len() {
                return section.articles.get(index);
            }
            index -= section.articles.len();
        }
        None
    }

    pub fn menu_nav(&mut self, delta: isize) {
        let len = self.menu_article_count();
        if len == 0 {
            self.menu_selected = 0;
            return;
        }
        self.menu_selected = if delta.is_negative() {
            self.menu_selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.menu_selected.saturating_add(delta as usize).min(len - 1)
        };
    }

    // ------------------------------------------------------------------
    // Search surface
    // ------------------------------------------------------------------

    /// Open the search overlay with a fresh session.
    pub fn open_search(&mut self) {
        self.search_surface = SearchSurface::Open;
        self.search.dismiss();
        self.needs_redraw = true;
    }

    /// Close the search overlay, discarding the session. Any in-flight
    /// request keeps running but its response will be stale on arrival.
    pub fn close_search(&mut self) {
        self.search_surface = SearchSurface::Closed;
        self.search.dismiss();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Compose the public URL for an article slug.
    pub fn article_url(&self, slug: &str) -> String {
        format!("{}/{}", self.site_url, slug)
    }

    // ------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------

    /// Set a status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message if older than 3 seconds.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        let cms = CmsClient::new("http://127.0.0.1:9/api", None).unwrap();
        App::new(
            cms,
            "https://blog.example.com/",
            vec![
                Topic {
                    id: "t1".into(),
                    slug: "renda-fixa".into(),
                    title: "Renda Fixa".into(),
                },
                Topic {
                    id: "t2".into(),
                    slug: "acoes".into(),
                    title: "Ações".into(),
                },
            ],
        )
    }

    fn article(id: &str, title: &str, category: Option<&str>) -> ArticleSummary {
        ArticleSummary {
            id: Arc::from(id),
            slug: Arc::from(format!("{}-slug", id).as_str()),
            title: Arc::from(title),
            description: None,
            category: category.map(Arc::from),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_set_store_refreshes_derived_state() {
        let mut app = test_app();
        app.set_store(vec![
            article("1", "A", Some("renda-fixa")),
            article("2", "B", Some("renda-fixa")),
            article("3", "C", None),
        ]);

        assert_eq!(app.visible.len(), 3);
        assert_eq!(app.counts.get("renda-fixa"), Some(&2));
        assert_eq!(app.counts.get("sem-categoria"), Some(&1));
        assert_eq!(app.menu_sections.len(), 2);
        assert_eq!(app.menu_sections[0].articles.len(), 2);
    }

    #[tokio::test]
    async fn test_set_category_filters_visible() {
        let mut app = test_app();
        app.set_store(vec![
            article("1", "A", Some("renda-fixa")),
            article("2", "B", Some("acoes")),
        ]);

        app.set_category(Some(Arc::from("acoes")));
        assert_eq!(app.visible.len(), 1);
        assert_eq!(&*app.visible[0].id, "2");

        app.set_category(None);
        assert_eq!(app.visible.len(), 2);
    }

    #[tokio::test]
    async fn test_cycle_category_wraps_both_ways() {
        let mut app = test_app();
        assert_eq!(app.view_state.active_category, None);

        app.cycle_category(1);
        assert_eq!(app.view_state.active_category.as_deref(), Some("renda-fixa"));
        app.cycle_category(1);
        assert_eq!(app.view_state.active_category.as_deref(), Some("acoes"));
        app.cycle_category(1);
        assert_eq!(app.view_state.active_category, None);

        app.cycle_category(-1);
        assert_eq!(app.view_state.active_category.as_deref(), Some("acoes"));
    }

    #[tokio::test]
    async fn test_category_change_resets_selection() {
        let mut app = test_app();
        app.set_store(vec![
            article("1", "A", Some("renda-fixa")),
            article("2", "B", Some("renda-fixa")),
            article("3", "C", Some("acoes")),
        ]);
        app.selected_article = 2;

        app.set_category(Some(Arc::from("acoes")));
        assert_eq!(app.selected_article, 0);
    }

    #[tokio::test]
    async fn test_clamp_after_store_shrinks() {
        let mut app = test_app();
        app.set_store(vec![
            article("1", "A", None),
            article("2", "B", None),
            article("3", "C", None),
        ]);
        app.selected_article = 2;

        app.set_store(vec![article("1", "A", None)]);
        assert_eq!(app.selected_article, 0);
    }

    #[tokio::test]
    async fn test_nav_bounds() {
        let mut app = test_app();
        app.nav_up();
        assert_eq!(app.selected_article, 0);
        app.nav_down();
        assert_eq!(app.selected_article, 0);

        app.set_store(vec![article("1", "A", None), article("2", "B", None)]);
        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected_article, 1);
    }

    #[tokio::test]
    async fn test_menu_flattened_selection() {
        let mut app = test_app();
        app.set_store(vec![
            article("1", "A", Some("renda-fixa")),
            article("2", "B", Some("acoes")),
            article("3", "C", Some("acoes")),
        ]);

        app.toggle_menu();
        assert!(app.menu.is_open());
        assert_eq!(app.menu_article_count(), 3);

        // Section order: renda-fixa [1], acoes [2, 3]
        assert_eq!(&*app.selected_menu_article().unwrap().id, "1");
        app.menu_nav(1);
        assert_eq!(&*app.selected_menu_article().unwrap().id, "2");
        app.menu_nav(5);
        assert_eq!(&*app.selected_menu_article().unwrap().id, "3");
    }

    #[tokio::test]
    async fn test_search_surfaces_reset_session() {
        let mut app = test_app();
        app.open_search();
        app.search.input("juros".to_string());
        assert_eq!(app.search.query, "juros");

        app.close_search();
        assert!(app.search.query.is_empty());
        assert!(!app.search_surface.is_open());
    }

    #[tokio::test]
    async fn test_article_url_joins_slug() {
        let app = test_app();
        assert_eq!(
            app.article_url("meu-post"),
            "https://blog.example.com/meu-post"
        );
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Pronto");

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
