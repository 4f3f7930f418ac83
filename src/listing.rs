//! Pure listing logic: category filtering, sort orders and per-topic
//! aggregation over the article store.
//!
//! Everything in this module is side-effect free and deterministic. The
//! store is never mutated — callers get freshly ordered clones (cheap:
//! article string fields are `Arc<str>`).

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cms::{ArticleSummary, Topic};
use crate::util::collation_key;

/// Counting bucket for articles without a category.
pub const UNCATEGORIZED: &str = "sem-categoria";

// ============================================================================
// View State
// ============================================================================

/// Listing sort order. `Recent` is the site default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Recent,
    Oldest,
    Alphabetical,
}

impl SortMode {
    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Recent => "Mais recente",
            SortMode::Oldest => "Mais antigo",
            SortMode::Alphabetical => "Ordem alfabética",
        }
    }

    /// Cycle through the three orders in selector order.
    pub fn next(self) -> Self {
        match self {
            SortMode::Recent => SortMode::Oldest,
            SortMode::Oldest => SortMode::Alphabetical,
            SortMode::Alphabetical => SortMode::Recent,
        }
    }
}

/// User-controlled listing state. `active_category = None` is the "Todos"
/// chip; `Some(slug)` narrows to one topic.
///
/// The visible article list is always derived from this plus the store via
/// [`view`] — it is never stored authoritatively.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub active_category: Option<Arc<str>>,
    pub sort_mode: SortMode,
}

// ============================================================================
// Filter / Sort Engine
// ============================================================================

/// Compute the visible article list for a category and sort order.
///
/// - `active_category = None` keeps the whole store; `Some(slug)` keeps
///   exactly the articles whose category equals `slug`. Uncategorized
///   articles appear only in the full view.
/// - All three orders are stable: articles that compare equal keep their
///   store order, so output is deterministic for any input.
/// - Missing publication dates sort as the epoch under `Recent` (oldest
///   possible) and as the far future under `Oldest` (last).
pub fn view(
    store: &[ArticleSummary],
    active_category: Option<&str>,
    sort_mode: SortMode,
) -> Vec<ArticleSummary> {
    let mut articles: Vec<ArticleSummary> = match active_category {
        None => store.to_vec(),
        Some(slug) => store
            .iter()
            .filter(|a| a.category.as_deref() == Some(slug))
            .cloned()
            .collect(),
    };

    match sort_mode {
        SortMode::Recent => {
            articles.sort_by_key(|a| Reverse(a.published_at.map_or(0, |dt| dt.timestamp())));
        }
        SortMode::Oldest => {
            articles.sort_by_key(|a| a.published_at.map_or(i64::MAX, |dt| dt.timestamp()));
        }
        SortMode::Alphabetical => {
            articles.sort_by_cached_key(|a| collation_key(&a.title));
        }
    }

    articles
}

// ============================================================================
// Aggregation
// ============================================================================

/// Count articles per category slug. Articles without a category are
/// grouped under [`UNCATEGORIZED`]. Topics with no articles simply have no
/// entry — the chip row renders no badge for them.
pub fn counts_by_category(store: &[ArticleSummary]) -> HashMap<Arc<str>, usize> {
    let mut counts: HashMap<Arc<str>, usize> = HashMap::new();
    for article in store {
        let key = article
            .category
            .clone()
            .unwrap_or_else(|| Arc::from(UNCATEGORIZED));
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// A configured topic together with its articles, in store order.
#[derive(Debug, Clone)]
pub struct TopicSection {
    pub topic: Topic,
    pub articles: Vec<ArticleSummary>,
}

/// Group the store under each configured topic for the navigation menu.
///
/// Sections follow the configured topic order; topics with no articles
/// yield an empty section rather than being dropped, matching how the menu
/// always shows every column.
pub fn topics_with_articles(topics: &[Topic], store: &[ArticleSummary]) -> Vec<TopicSection> {
    topics
        .iter()
        .map(|topic| TopicSection {
            topic: topic.clone(),
            articles: store
                .iter()
                .filter(|a| a.category.as_deref() == Some(topic.slug.as_str()))
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(id: &str, title: &str, category: Option<&str>, date: Option<&str>) -> ArticleSummary {
        ArticleSummary {
            id: Arc::from(id),
            slug: Arc::from(format!("{}-slug", id).as_str()),
            title: Arc::from(title),
            description: None,
            category: category.map(Arc::from),
            published_at: date.map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc()
            }),
        }
    }

    fn ids(articles: &[ArticleSummary]) -> Vec<&str> {
        articles.iter().map(|a| &*a.id).collect()
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    #[test]
    fn test_view_all_is_permutation_of_store() {
        let store = vec![
            article("1", "A", Some("x"), Some("2024-01-01")),
            article("2", "B", None, None),
            article("3", "C", Some("y"), Some("2023-05-05")),
        ];
        let visible = view(&store, None, SortMode::Recent);
        assert_eq!(visible.len(), store.len());
        let mut seen = ids(&visible);
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_view_category_keeps_only_matches() {
        let store = vec![
            article("1", "A", Some("x"), None),
            article("2", "B", Some("y"), None),
            article("3", "C", Some("x"), None),
            article("4", "D", None, None),
        ];
        let visible = view(&store, Some("x"), SortMode::Recent);
        assert_eq!(ids(&visible), vec!["1", "3"]);
    }

    #[test]
    fn test_view_uncategorized_excluded_from_topic_views() {
        let store = vec![article("1", "A", None, None)];
        assert!(view(&store, Some("x"), SortMode::Recent).is_empty());
        assert!(view(&store, Some(UNCATEGORIZED), SortMode::Recent).is_empty());
    }

    #[test]
    fn test_view_unknown_category_is_empty() {
        let store = vec![article("1", "A", Some("x"), None)];
        assert!(view(&store, Some("nope"), SortMode::Recent).is_empty());
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    #[test]
    fn test_recent_descending_missing_dates_oldest() {
        let store = vec![
            article("old", "Old", None, Some("2023-01-01")),
            article("none", "Undated", None, None),
            article("new", "New", None, Some("2024-06-01")),
        ];
        let visible = view(&store, None, SortMode::Recent);
        assert_eq!(ids(&visible), vec!["new", "old", "none"]);
    }

    #[test]
    fn test_oldest_ascending_missing_dates_last() {
        let store = vec![
            article("none", "Undated", None, None),
            article("new", "New", None, Some("2024-06-01")),
            article("old", "Old", None, Some("2023-01-01")),
        ];
        let visible = view(&store, None, SortMode::Oldest);
        assert_eq!(ids(&visible), vec!["old", "new", "none"]);
    }

    #[test]
    fn test_alphabetical_case_and_accent_insensitive() {
        let store = vec![
            article("1", "zebra", None, None),
            article("2", "Ações", None, None),
            article("3", "Banco", None, None),
        ];
        let visible = view(&store, None, SortMode::Alphabetical);
        assert_eq!(ids(&visible), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_alphabetical_ties_keep_store_order() {
        let store = vec![
            article("first", "Mesmo título", None, Some("2024-01-01")),
            article("second", "mesmo TÍTULO", None, Some("2022-01-01")),
            article("third", "Mesmo Título", None, None),
        ];
        let visible = view(&store, None, SortMode::Alphabetical);
        assert_eq!(ids(&visible), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_recent_ties_keep_store_order() {
        let store = vec![
            article("a", "A", None, Some("2024-01-01")),
            article("b", "B", None, Some("2024-01-01")),
            article("c", "C", None, Some("2024-01-01")),
        ];
        let visible = view(&store, None, SortMode::Recent);
        assert_eq!(ids(&visible), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zebra_apple_example() {
        let store = vec![
            article("1", "Zebra", None, Some("2024-01-01")),
            article("2", "Apple", None, Some("2024-06-01")),
        ];
        let alpha = view(&store, None, SortMode::Alphabetical);
        assert_eq!(ids(&alpha), vec!["2", "1"]);
        let recent = view(&store, None, SortMode::Recent);
        assert_eq!(ids(&recent), vec!["2", "1"]);
    }

    #[test]
    fn test_view_does_not_mutate_store() {
        let store = vec![
            article("1", "Zebra", None, None),
            article("2", "Apple", None, None),
        ];
        let before = ids(&store).into_iter().map(String::from).collect::<Vec<_>>();
        let _ = view(&store, None, SortMode::Alphabetical);
        assert_eq!(ids(&store), before);
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    #[test]
    fn test_counts_by_category_with_uncategorized() {
        let store = vec![
            article("1", "A", Some("x"), None),
            article("2", "B", Some("x"), None),
            article("3", "C", None, None),
        ];
        let counts = counts_by_category(&store);
        assert_eq!(counts.get("x"), Some(&2));
        assert_eq!(counts.get(UNCATEGORIZED), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_empty_store() {
        assert!(counts_by_category(&[]).is_empty());
    }

    #[test]
    fn test_counts_zero_articles_omits_entry() {
        let store = vec![article("1", "A", Some("x"), None)];
        let counts = counts_by_category(&store);
        assert_eq!(counts.get("y"), None);
    }

    #[test]
    fn test_topics_with_articles_groups_in_store_order() {
        let topics = vec![
            Topic {
                id: "t1".into(),
                slug: "x".into(),
                title: "X".into(),
            },
            Topic {
                id: "t2".into(),
                slug: "y".into(),
                title: "Y".into(),
            },
        ];
        let store = vec![
            article("1", "A", Some("y"), None),
            article("2", "B", Some("x"), None),
            article("3", "C", Some("y"), None),
            article("4", "D", None, None),
        ];
        let sections = topics_with_articles(&topics, &store);
        assert_eq!(sections.len(), 2);
        assert_eq!(ids(&sections[0].articles), vec!["2"]);
        assert_eq!(ids(&sections[1].articles), vec!["1", "3"]);
    }

    #[test]
    fn test_topics_with_no_articles_yield_empty_section() {
        let topics = vec![Topic {
            id: "t1".into(),
            slug: "vazio".into(),
            title: "Vazio".into(),
        }];
        let sections = topics_with_articles(&topics, &[]);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].articles.is_empty());
    }

    // ========================================================================
    // Properties
    // ========================================================================

    fn arb_article() -> impl Strategy<Value = ArticleSummary> {
        (
            "[a-z]{1,8}",
            "[A-Za-z ]{0,12}",
            proptest::option::of(prop_oneof!["x", "y", "z"]),
            proptest::option::of(0i64..2_000_000_000),
        )
            .prop_map(|(id, title, category, ts)| ArticleSummary {
                id: Arc::from(id.as_str()),
                slug: Arc::from(id.as_str()),
                title: Arc::from(title.as_str()),
                description: None,
                category: category.map(|c| Arc::from(c.as_str())),
                published_at: ts.map(|t| Utc.timestamp_opt(t, 0).unwrap()),
            })
    }

    proptest! {
        #[test]
        fn prop_category_view_only_contains_that_category(
            store in proptest::collection::vec(arb_article(), 0..30),
            slug in prop_oneof!["x", "y", "z"],
        ) {
            for mode in [SortMode::Recent, SortMode::Oldest, SortMode::Alphabetical] {
                let visible = view(&store, Some(slug.as_str()), mode);
                prop_assert!(visible.iter().all(|a| a.category.as_deref() == Some(slug.as_str())));
            }
        }

        #[test]
        fn prop_all_view_is_permutation(
            store in proptest::collection::vec(arb_article(), 0..30),
        ) {
            for mode in [SortMode::Recent, SortMode::Oldest, SortMode::Alphabetical] {
                let visible = view(&store, None, mode);
                prop_assert_eq!(visible.len(), store.len());
                let mut a: Vec<_> = visible.iter().map(|x| x.id.clone()).collect();
                let mut b: Vec<_> = store.iter().map(|x| x.id.clone()).collect();
                a.sort_unstable();
                b.sort_unstable();
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_recent_is_sorted_descending(
            store in proptest::collection::vec(arb_article(), 0..30),
        ) {
            let visible = view(&store, None, SortMode::Recent);
            let keys: Vec<i64> = visible
                .iter()
                .map(|a| a.published_at.map_or(0, |dt| dt.timestamp()))
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn prop_counts_sum_to_store_len(
            store in proptest::collection::vec(arb_article(), 0..30),
        ) {
            let counts = counts_by_category(&store);
            prop_assert_eq!(counts.values().sum::<usize>(), store.len());
        }
    }
}
