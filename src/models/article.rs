use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored article, enriched with alert state at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub url: String,
    /// Publication date as reported by the source, not parsed.
    pub date: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub alert: bool,
    /// Lowercased words of every enabled keyword that matched at ingestion.
    pub matched_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// An unprocessed record as produced by the scraper, prior to dedup and
/// keyword scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub url: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

impl RawArticle {
    /// Attach the alert verdict computed by the pipeline.
    pub fn scored(self, alert: bool, matched_keywords: Vec<String>) -> NewArticle {
        NewArticle {
            title: self.title,
            summary: self.summary,
            url: self.url,
            date: self.date,
            tags: self.tags,
            image_url: self.image_url,
            alert,
            matched_keywords,
        }
    }
}

/// Insert record for the article store.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub date: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub alert: bool,
    pub matched_keywords: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<Option<String>>,
    pub alert: Option<bool>,
    pub matched_keywords: Option<Vec<String>>,
}
