use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Creation collided with an existing record's unique key (keyword word,
    /// article URL).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Reserved for the query boundary; store lookups themselves signal
    /// absence with `Option`.
    #[allow(dead_code)]
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input for a create/update operation.
    #[error("validation: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlParse(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors that should abort a whole ingestion run rather than
    /// skip a single candidate.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Io(_) | AppError::Other(_)
        )
    }
}
