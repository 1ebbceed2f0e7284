use std::sync::RwLock;

use chrono::Utc;

use crate::models::{Settings, SettingsUpdate};

/// Holds the singleton alerting settings record. Always present; partial
/// updates merge into the existing record rather than replacing it.
pub struct SettingsStore {
    inner: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Settings::default()),
        }
    }

    pub fn get(&self) -> Settings {
        self.inner.read().expect("settings lock poisoned").clone()
    }

    /// Shallow merge: the recipients list and the smtp block are replaced
    /// wholesale when provided. Recipients are deduplicated preserving first
    /// occurrence, case-sensitively.
    pub fn update(&self, update: SettingsUpdate) -> Settings {
        let mut settings = self.inner.write().expect("settings lock poisoned");
        if let Some(email_alerts) = update.email_alerts {
            settings.email_alerts = email_alerts;
        }
        if let Some(recipients) = update.email_recipients {
            let mut deduped: Vec<String> = Vec::with_capacity(recipients.len());
            for recipient in recipients {
                if !deduped.contains(&recipient) {
                    deduped.push(recipient);
                }
            }
            settings.email_recipients = deduped;
        }
        if let Some(smtp) = update.smtp {
            settings.smtp = smtp;
        }
        settings.clone()
    }

    /// Records the completion time of an ingestion run.
    pub fn touch_last_ingested(&self) {
        let mut settings = self.inner.write().expect("settings lock poisoned");
        settings.last_ingested_at = Some(Utc::now());
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
