use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Article, RawArticle};
use crate::store::{ArticleStore, KeywordRegistry};

/// Orchestrates one ingestion run: dedup candidates against the article
/// store by URL, score new ones against the active keyword set, tally
/// keyword match counts, persist. Owns no state of its own beyond the run
/// lock that serializes overlapping triggers.
pub struct Pipeline {
    articles: Arc<ArticleStore>,
    keywords: Arc<KeywordRegistry>,
    run_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(articles: Arc<ArticleStore>, keywords: Arc<KeywordRegistry>) -> Self {
        Self {
            articles,
            keywords,
            run_lock: Mutex::new(()),
        }
    }

    /// Processes candidates strictly in input order. A candidate that fails
    /// on its own (malformed, racy conflict) is logged and skipped; the run
    /// carries on. The active keyword set is snapshotted once at run start,
    /// so keywords added or enabled mid-run apply from the next run.
    pub async fn ingest(&self, candidates: Vec<RawArticle>) -> Result<Vec<Article>> {
        let _run = self.run_lock.lock().await;

        let active = self.keywords.active_words();
        let mut ingested = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let url = candidate.url.clone();
            match self.process(candidate, &active) {
                Ok(article) => ingested.push(article),
                Err(e) if e.is_infrastructure() => return Err(e),
                Err(e) => {
                    tracing::warn!("skipping candidate {}: {}", url, e);
                }
            }
        }

        Ok(ingested)
    }

    fn process(&self, candidate: RawArticle, active: &[(i64, String)]) -> Result<Article> {
        // Already ingested: return as-is, never re-score or re-count, even
        // if the keyword set has changed since.
        if let Some(existing) = self.articles.find_by_url(&candidate.url) {
            return Ok(existing);
        }

        if candidate.url.trim().is_empty() {
            return Err(AppError::Validation("candidate has no url".to_string()));
        }
        if candidate.title.trim().is_empty() {
            return Err(AppError::Validation("candidate has no title".to_string()));
        }

        let corpus = format!("{} {}", candidate.title, candidate.summary).to_lowercase();

        let mut matched = Vec::new();
        for (id, word) in active {
            // One increment per matching article, no matter how often the
            // word recurs in the corpus.
            if corpus.contains(word.as_str()) {
                matched.push(word.clone());
                if self.keywords.increment_match(*id).is_none() {
                    tracing::warn!("keyword {} vanished mid-run", id);
                }
            }
        }

        let alert = !matched.is_empty();
        self.articles.create(candidate.scored(alert, matched))
    }
}
