//! Article filtering and facet extraction.
//!
//! Everything here is a pure function over a slice of articles. The functions
//! are generic over `AsRef<Article>` so they accept both `&[Article]` and the
//! controller's `&[Arc<Article>]`.
use std::collections::{BTreeSet, HashSet};

use crate::storage::Article;

/// Normalize raw search input: trimmed and lowercased.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Free-text predicate.
///
/// `query` is expected to be normalized already (see [`normalize_query`]).
/// An empty query matches everything; otherwise the query must appear as a
/// substring of the lowercased title, content and tags.
pub fn matches_query(article: &Article, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let haystack = format!(
        "{} {} {}",
        article.title,
        article.content,
        article.tags.join(" ")
    )
    .to_lowercase();
    haystack.contains(query)
}

/// Exact, case-sensitive tag membership. `None` matches everything.
pub fn matches_tag(article: &Article, tag: Option<&str>) -> bool {
    match tag {
        None => true,
        Some(tag) => article.tags.iter().any(|t| t == tag),
    }
}

/// Exact category equality. `None` matches everything.
pub fn matches_category(article: &Article, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(category) => article.category == category,
    }
}

/// Articles passing all three predicates, newest first.
///
/// Dates are ISO `YYYY-MM-DD`, so string order is date order. The sort is
/// stable: articles sharing a date keep their input order.
pub fn visible<'a, A: AsRef<Article>>(
    articles: &'a [A],
    query: &str,
    tag: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a A> {
    let mut out: Vec<&A> = articles
        .iter()
        .filter(|a| {
            let a = a.as_ref();
            matches_query(a, query) && matches_tag(a, tag) && matches_category(a, category)
        })
        .collect();
    out.sort_by(|a, b| b.as_ref().date.cmp(&a.as_ref().date));
    out
}

/// Unique categories in order of first appearance.
pub fn all_categories<A: AsRef<Article>>(articles: &[A]) -> Vec<String> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .map(|a| a.as_ref().category.as_str())
        .filter(|c| seen.insert(*c))
        .map(str::to_owned)
        .collect()
}

/// Unique tags across all articles, ascending.
pub fn all_tags<A: AsRef<Article>>(articles: &[A]) -> Vec<String> {
    articles
        .iter()
        .flat_map(|a| a.as_ref().tags.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(id: &str, date: &str, tags: &[&str], category: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Post {id}"),
            date: date.to_string(),
            content: String::new(),
            image: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: category.to_string(),
        }
    }

    fn ids<A: AsRef<Article>>(articles: &[&A]) -> Vec<String> {
        articles.iter().map(|a| a.as_ref().id.clone()).collect()
    }

    fn sample() -> Vec<Article> {
        vec![
            article("p1", "2025-01-01", &["intro", "feature"], "General"),
            article("p2", "2025-01-10", &["travel", "outdoors"], "Travel"),
            article("p3", "2025-01-20", &["tech", "future"], "Technology"),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Rust Lang \n"), "rust lang");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_no_filters_sorts_date_descending() {
        let articles = vec![
            article("p1", "2025-01-01", &["intro"], "General"),
            article("p2", "2025-01-20", &["tech"], "General"),
        ];
        let out = visible(&articles, "", None, None);
        assert_eq!(ids(&out), vec!["p2", "p1"]);
    }

    #[test]
    fn test_query_matches_title_content_and_tags() {
        let mut articles = sample();
        articles[1].content = "<p>Mountains and FRESH air</p>".to_string();

        assert_eq!(ids(&visible(&articles, "fresh air", None, None)), vec!["p2"]);
        assert_eq!(ids(&visible(&articles, "post p3", None, None)), vec!["p3"]);
        assert_eq!(ids(&visible(&articles, "outdoors", None, None)), vec!["p2"]);
        assert!(visible(&articles, "nothing like this", None, None).is_empty());
    }

    #[test]
    fn test_query_spans_field_boundaries() {
        // Fields are joined with a space, so "title content" substrings match.
        let mut a = article("p1", "2025-01-01", &["intro"], "General");
        a.title = "Hello".to_string();
        a.content = "World".to_string();
        assert!(matches_query(&a, "hello world"));
        assert!(matches_query(&a, "world intro"));
        assert!(!matches_query(&a, "helloworld"));
    }

    #[test]
    fn test_tag_is_exact_and_case_sensitive() {
        let articles = sample();
        assert_eq!(ids(&visible(&articles, "", Some("intro"), None)), vec!["p1"]);
        assert!(visible(&articles, "", Some("Intro"), None).is_empty());
        assert!(visible(&articles, "", Some("intr"), None).is_empty());
    }

    #[test]
    fn test_category_is_exact() {
        let articles = sample();
        assert_eq!(
            ids(&visible(&articles, "", None, Some("Travel"))),
            vec!["p2"]
        );
        assert!(visible(&articles, "", None, Some("travel")).is_empty());
    }

    #[test]
    fn test_filters_combine_with_and() {
        let articles = vec![
            article("a", "2025-01-01", &["rust"], "Technology"),
            article("b", "2025-01-02", &["rust"], "General"),
            article("c", "2025-01-03", &["go"], "Technology"),
        ];
        let out = visible(&articles, "", Some("rust"), Some("Technology"));
        assert_eq!(ids(&out), vec!["a"]);

        let out = visible(&articles, "post c", Some("rust"), None);
        assert!(out.is_empty());
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let articles = vec![
            article("x", "2025-01-05", &[], "A"),
            article("y", "2025-01-09", &[], "A"),
            article("z", "2025-01-05", &[], "A"),
            article("w", "2025-01-05", &[], "A"),
        ];
        assert_eq!(
            ids(&visible(&articles, "", None, None)),
            vec!["y", "x", "z", "w"]
        );
    }

    #[test]
    fn test_all_categories_first_occurrence_order() {
        let articles = vec![
            article("a", "2025-01-01", &[], "Travel"),
            article("b", "2025-01-01", &[], "General"),
            article("c", "2025-01-01", &[], "Travel"),
            article("d", "2025-01-01", &[], "Technology"),
        ];
        assert_eq!(
            all_categories(&articles),
            vec!["Travel", "General", "Technology"]
        );
    }

    #[test]
    fn test_all_tags_sorted_unique() {
        let articles = sample();
        assert_eq!(
            all_tags(&articles),
            vec!["feature", "future", "intro", "outdoors", "tech", "travel"]
        );
    }

    #[test]
    fn test_empty_collection() {
        let articles: Vec<Article> = Vec::new();
        assert!(visible(&articles, "x", Some("t"), Some("c")).is_empty());
        assert!(all_tags(&articles).is_empty());
        assert!(all_categories(&articles).is_empty());
    }

    #[test]
    fn test_works_with_arc_articles() {
        let articles: Vec<std::sync::Arc<Article>> =
            sample().into_iter().map(std::sync::Arc::new).collect();
        let out = visible(&articles, "", None, Some("Technology"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "p3");
        assert_eq!(all_categories(&articles).len(), 3);
    }

    // ========================================================================
    // Properties
    // ========================================================================

    const TAGS: [&str; 4] = ["intro", "tech", "travel", "Tech"];
    const CATEGORIES: [&str; 3] = ["General", "Travel", "Technology"];

    fn arb_article() -> impl Strategy<Value = Article> {
        (
            "[a-z]{1,6}",
            1u32..=28,
            proptest::sample::subsequence(TAGS.to_vec(), 0..=3),
            proptest::sample::select(CATEGORIES.to_vec()),
            "[a-zA-Z ]{0,12}",
        )
            .prop_map(|(id, day, tags, category, title)| Article {
                id,
                title,
                date: format!("2025-02-{day:02}"),
                content: String::new(),
                image: String::new(),
                tags: tags.into_iter().map(str::to_owned).collect(),
                category: category.to_string(),
            })
    }

    fn arb_filter() -> impl Strategy<Value = (String, Option<String>, Option<String>)> {
        (
            "[a-z ]{0,3}",
            proptest::option::of(proptest::sample::select(TAGS.to_vec())),
            proptest::option::of(proptest::sample::select(CATEGORIES.to_vec())),
        )
            .prop_map(|(q, t, c)| {
                (
                    normalize_query(&q),
                    t.map(str::to_owned),
                    c.map(str::to_owned),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_visible_is_filtered_subset(
            articles in proptest::collection::vec(arb_article(), 0..12),
            (query, tag, category) in arb_filter(),
        ) {
            let out = visible(&articles, &query, tag.as_deref(), category.as_deref());
            prop_assert!(out.len() <= articles.len());
            for a in &out {
                prop_assert!(articles.iter().any(|x| std::ptr::eq(x, *a)));
                prop_assert!(matches_query(a, &query));
                prop_assert!(matches_tag(a, tag.as_deref()));
                prop_assert!(matches_category(a, category.as_deref()));
            }
            // Nothing that passes all predicates is dropped.
            let expected = articles
                .iter()
                .filter(|a| matches_query(a, &query)
                    && matches_tag(a, tag.as_deref())
                    && matches_category(a, category.as_deref()))
                .count();
            prop_assert_eq!(out.len(), expected);
        }

        #[test]
        fn prop_visible_is_stable_date_descending(
            articles in proptest::collection::vec(arb_article(), 0..12),
        ) {
            let out = visible(&articles, "", None, None);
            let position = |a: &Article| articles.iter().position(|x| std::ptr::eq(x, a));
            for pair in out.windows(2) {
                prop_assert!(pair[0].date >= pair[1].date);
                if pair[0].date == pair[1].date {
                    prop_assert!(position(pair[0]) < position(pair[1]));
                }
            }
        }
    }
}
