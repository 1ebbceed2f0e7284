use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked alert keyword. "Deleting" a keyword only flips its state to
/// `Disabled` so the match history survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub word: String,
    pub state: KeywordState,
    pub matches: u64,
    pub created_at: DateTime<Utc>,
}

impl Keyword {
    pub fn is_active(&self) -> bool {
        self.state == KeywordState::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordState {
    #[default]
    Active,
    Disabled,
}

impl KeywordState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            KeywordState::Active
        } else {
            KeywordState::Disabled
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewKeyword {
    pub word: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Partial update; the external surface speaks in terms of an `enabled`
/// flag, mapped onto `KeywordState` by the registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordUpdate {
    pub word: Option<String>,
    pub enabled: Option<bool>,
}
