use std::sync::RwLock;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleUpdate, NewArticle};

/// In-memory article store. Contents reset on restart; identities are
/// assigned monotonically and articles are never deleted.
pub struct ArticleStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    // Insertion order; ids are dense so lookups stay simple.
    articles: Vec<Article>,
    next_id: i64,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                articles: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// All articles, most recently ingested first. Ties in `created_at`
    /// keep insertion order (stable sort) so pagination is deterministic.
    /// An out-of-range offset yields an empty vec, never an error.
    pub fn list(&self, limit: usize, offset: usize) -> Vec<Article> {
        let inner = self.inner.read().expect("article store lock poisoned");
        paginate(inner.articles.iter().cloned().collect(), limit, offset)
    }

    pub fn find_by_id(&self, id: i64) -> Option<Article> {
        let inner = self.inner.read().expect("article store lock poisoned");
        inner.articles.iter().find(|a| a.id == id).cloned()
    }

    /// Exact, case-sensitive URL match.
    pub fn find_by_url(&self, url: &str) -> Option<Article> {
        let inner = self.inner.read().expect("article store lock poisoned");
        inner.articles.iter().find(|a| a.url == url).cloned()
    }

    /// Inserts a new article, assigning its id and ingestion timestamp.
    /// URL uniqueness is enforced here, under the same write lock as the
    /// insert, so a duplicate can never slip in between check and create.
    pub fn create(&self, new: NewArticle) -> Result<Article> {
        let mut inner = self.inner.write().expect("article store lock poisoned");
        if inner.articles.iter().any(|a| a.url == new.url) {
            return Err(AppError::Conflict(format!(
                "article with url {} already exists",
                new.url
            )));
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let article = Article {
            id,
            title: new.title,
            summary: new.summary,
            url: new.url,
            date: new.date,
            tags: new.tags,
            image_url: new.image_url,
            alert: new.alert,
            matched_keywords: new.matched_keywords,
            created_at: Utc::now(),
        };
        inner.articles.push(article.clone());
        Ok(article)
    }

    /// Merges the provided fields into an existing article. `created_at`
    /// and `url` are immutable.
    pub fn update(&self, id: i64, update: ArticleUpdate) -> Option<Article> {
        let mut inner = self.inner.write().expect("article store lock poisoned");
        let article = inner.articles.iter_mut().find(|a| a.id == id)?;
        if let Some(title) = update.title {
            article.title = title;
        }
        if let Some(summary) = update.summary {
            article.summary = summary;
        }
        if let Some(date) = update.date {
            article.date = date;
        }
        if let Some(tags) = update.tags {
            article.tags = tags;
        }
        if let Some(image_url) = update.image_url {
            article.image_url = image_url;
        }
        if let Some(alert) = update.alert {
            article.alert = alert;
        }
        if let Some(matched) = update.matched_keywords {
            article.matched_keywords = matched;
        }
        Some(article.clone())
    }

    /// Articles flagged as alerts, same ordering and pagination as `list`.
    pub fn list_alerts(&self, limit: usize, offset: usize) -> Vec<Article> {
        let inner = self.inner.read().expect("article store lock poisoned");
        paginate(
            inner.articles.iter().filter(|a| a.alert).cloned().collect(),
            limit,
            offset,
        )
    }

    /// Articles whose tag list contains `tag` exactly.
    pub fn list_by_tag(&self, tag: &str, limit: usize, offset: usize) -> Vec<Article> {
        let inner = self.inner.read().expect("article store lock poisoned");
        paginate(
            inner
                .articles
                .iter()
                .filter(|a| a.tags.iter().any(|t| t == tag))
                .cloned()
                .collect(),
            limit,
            offset,
        )
    }

    /// Total number of stored articles.
    pub fn count(&self) -> usize {
        let inner = self.inner.read().expect("article store lock poisoned");
        inner.articles.len()
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate(mut articles: Vec<Article>, limit: usize, offset: usize) -> Vec<Article> {
    // Stable: equal timestamps keep insertion order.
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    articles.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: &str, title: &str, tags: &[&str]) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            summary: "summary".to_string(),
            url: url.to_string(),
            date: "June 1, 2025".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
            alert: false,
            matched_keywords: Vec::new(),
        }
    }

    #[test]
    fn create_assigns_monotonic_ids() {
        let store = ArticleStore::new();
        let a = store.create(raw("https://example.com/a", "A", &[])).unwrap();
        let b = store.create(raw("https://example.com/b", "B", &[])).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn create_rejects_duplicate_url() {
        let store = ArticleStore::new();
        store.create(raw("https://example.com/a", "A", &[])).unwrap();
        let err = store
            .create(raw("https://example.com/a", "A again", &[]))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn find_by_id_resolves_known_ids_only() {
        let store = ArticleStore::new();
        let created = store.create(raw("https://example.com/a", "A", &[])).unwrap();
        assert_eq!(store.find_by_id(created.id).unwrap().url, created.url);
        assert!(store.find_by_id(999).is_none());
    }

    #[test]
    fn find_by_url_is_case_sensitive() {
        let store = ArticleStore::new();
        store.create(raw("https://example.com/Abc", "A", &[])).unwrap();
        assert!(store.find_by_url("https://example.com/Abc").is_some());
        assert!(store.find_by_url("https://example.com/abc").is_none());
    }

    #[test]
    fn list_is_most_recent_first() {
        let store = ArticleStore::new();
        for i in 0..4 {
            store
                .create(raw(&format!("https://example.com/{i}"), "t", &[]))
                .unwrap();
        }
        let listed = store.list(10, 0);
        let ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
        // Equal-timestamp ties fall back to insertion order; strictly newer
        // articles always come first. Either way the ordering must be a
        // permutation that is non-increasing in created_at.
        for pair in listed.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn pagination_slices_are_disjoint_and_contiguous() {
        let store = ArticleStore::new();
        for i in 0..5 {
            store
                .create(raw(&format!("https://example.com/{i}"), "t", &[]))
                .unwrap();
        }
        let full = store.list(10, 0);
        let first = store.list(2, 0);
        let second = store.list(2, 2);
        let first_ids: Vec<i64> = first.iter().map(|a| a.id).collect();
        let second_ids: Vec<i64> = second.iter().map(|a| a.id).collect();
        assert_eq!(first_ids, full[0..2].iter().map(|a| a.id).collect::<Vec<_>>());
        assert_eq!(second_ids, full[2..4].iter().map(|a| a.id).collect::<Vec<_>>());
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
    }

    #[test]
    fn out_of_range_offset_is_empty() {
        let store = ArticleStore::new();
        store.create(raw("https://example.com/a", "A", &[])).unwrap();
        assert!(store.list(10, 100).is_empty());
        assert!(store.list_alerts(10, 100).is_empty());
    }

    #[test]
    fn list_alerts_filters_on_flag() {
        let store = ArticleStore::new();
        let mut flagged = raw("https://example.com/a", "A", &[]);
        flagged.alert = true;
        flagged.matched_keywords = vec!["cve".to_string()];
        store.create(flagged).unwrap();
        store.create(raw("https://example.com/b", "B", &[])).unwrap();

        let alerts = store.list_alerts(10, 0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].url, "https://example.com/a");
    }

    #[test]
    fn list_by_tag_matches_exactly() {
        let store = ArticleStore::new();
        store
            .create(raw("https://example.com/a", "A", &["Ransomware", "Windows"]))
            .unwrap();
        store
            .create(raw("https://example.com/b", "B", &["Linux"]))
            .unwrap();

        assert_eq!(store.list_by_tag("Ransomware", 10, 0).len(), 1);
        assert!(store.list_by_tag("ransomware", 10, 0).is_empty());
        assert!(store.list_by_tag("Android", 10, 0).is_empty());
    }

    #[test]
    fn update_merges_partial_fields() {
        let store = ArticleStore::new();
        let created = store.create(raw("https://example.com/a", "A", &[])).unwrap();

        let updated = store
            .update(
                created.id,
                ArticleUpdate {
                    title: Some("New title".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.summary, created.summary);
        assert_eq!(updated.url, created.url);
        assert_eq!(updated.created_at, created.created_at);

        assert!(store.update(999, ArticleUpdate::default()).is_none());
    }
}
