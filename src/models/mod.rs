mod article;
mod keyword;
mod settings;

pub use article::{Article, ArticleUpdate, NewArticle, RawArticle};
pub use keyword::{Keyword, KeywordState, KeywordUpdate, NewKeyword};
pub use settings::{Settings, SettingsUpdate, SmtpSettings};
