use std::sync::RwLock;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Keyword, KeywordState, KeywordUpdate, NewKeyword};

/// Keywords every fresh registry starts with.
pub const DEFAULT_KEYWORDS: [&str; 6] =
    ["zero-day", "ransomware", "CVE", "phishing", "APT", "DDoS"];

/// In-memory keyword registry. Words are unique case-insensitively and
/// records are never removed; a "deleted" keyword is merely disabled so its
/// match history is preserved.
pub struct KeywordRegistry {
    inner: RwLock<Inner>,
}

struct Inner {
    keywords: Vec<Keyword>,
    next_id: i64,
}

impl KeywordRegistry {
    /// A registry pre-seeded with the default keyword set.
    pub fn new() -> Self {
        let registry = Self::empty();
        for word in DEFAULT_KEYWORDS {
            // A fresh registry cannot conflict with itself.
            let _ = registry.create(NewKeyword {
                word: word.to_string(),
                enabled: true,
            });
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(Inner {
                keywords: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// All keywords in insertion order.
    pub fn list(&self) -> Vec<Keyword> {
        let inner = self.inner.read().expect("keyword registry lock poisoned");
        inner.keywords.clone()
    }

    pub fn find(&self, id: i64) -> Option<Keyword> {
        let inner = self.inner.read().expect("keyword registry lock poisoned");
        inner.keywords.iter().find(|k| k.id == id).cloned()
    }

    /// Case-insensitive exact word match.
    pub fn find_by_word(&self, word: &str) -> Option<Keyword> {
        let needle = word.to_lowercase();
        let inner = self.inner.read().expect("keyword registry lock poisoned");
        inner
            .keywords
            .iter()
            .find(|k| k.word.to_lowercase() == needle)
            .cloned()
    }

    pub fn create(&self, new: NewKeyword) -> Result<Keyword> {
        let needle = new.word.to_lowercase();
        let mut inner = self.inner.write().expect("keyword registry lock poisoned");
        if inner
            .keywords
            .iter()
            .any(|k| k.word.to_lowercase() == needle)
        {
            return Err(AppError::Conflict(format!(
                "keyword {:?} already exists",
                new.word
            )));
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let keyword = Keyword {
            id,
            word: new.word,
            state: KeywordState::from_enabled(new.enabled),
            matches: 0,
            created_at: Utc::now(),
        };
        inner.keywords.push(keyword.clone());
        Ok(keyword)
    }

    /// Merges the provided fields into an existing keyword.
    pub fn update(&self, id: i64, update: KeywordUpdate) -> Option<Keyword> {
        let mut inner = self.inner.write().expect("keyword registry lock poisoned");
        let keyword = inner.keywords.iter_mut().find(|k| k.id == id)?;
        if let Some(word) = update.word {
            keyword.word = word;
        }
        if let Some(enabled) = update.enabled {
            keyword.state = KeywordState::from_enabled(enabled);
        }
        Some(keyword.clone())
    }

    /// Atomically adds one to the keyword's match counter.
    pub fn increment_match(&self, id: i64) -> Option<Keyword> {
        let mut inner = self.inner.write().expect("keyword registry lock poisoned");
        let keyword = inner.keywords.iter_mut().find(|k| k.id == id)?;
        keyword.matches += 1;
        Some(keyword.clone())
    }

    /// Logical delete: the record stays, with its match count, but stops
    /// participating in matching.
    pub fn disable(&self, id: i64) -> Option<Keyword> {
        self.update(
            id,
            KeywordUpdate {
                word: None,
                enabled: Some(false),
            },
        )
    }

    /// Snapshot of active keywords as `(id, lowercased word)`, in insertion
    /// order. The pipeline takes this once per run.
    pub fn active_words(&self) -> Vec<(i64, String)> {
        let inner = self.inner.read().expect("keyword registry lock poisoned");
        inner
            .keywords
            .iter()
            .filter(|k| k.is_active())
            .map(|k| (k.id, k.word.to_lowercase()))
            .collect()
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}
