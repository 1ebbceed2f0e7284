mod articles;
mod keywords;
mod settings;

pub use articles::ArticleStore;
pub use keywords::{KeywordRegistry, DEFAULT_KEYWORDS};
pub use settings::SettingsStore;
