use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton alerting configuration. Exactly one record exists for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub email_alerts: bool,
    pub email_recipients: Vec<String>,
    pub smtp: SmtpSettings,
    /// `None` until the first ingestion run completes.
    pub last_ingested_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_alerts: true,
            email_recipients: Vec::new(),
            smtp: SmtpSettings::default(),
            last_ingested_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Partial update; lists and the smtp block are replaced wholesale, never
/// merged field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub email_alerts: Option<bool>,
    pub email_recipients: Option<Vec<String>>,
    pub smtp: Option<SmtpSettings>,
}
