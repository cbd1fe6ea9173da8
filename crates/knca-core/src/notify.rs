//! User-facing notifications and the activity log.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// How long a notification stays visible by default.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// CSS class used by the HTML rendering.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }
}

/// Pending notifications, each expiring after a fixed TTL.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    items: Vec<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationCenter {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.push_at(level, message, Utc::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    pub fn push_at(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) {
        self.items.push(Notification {
            level,
            message: message.into(),
            created_at,
        });
    }

    /// Drop notifications older than the TTL and return the rest.
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Notification] {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        self.items.retain(|n| now.signed_duration_since(n.created_at) < ttl);
        &self.items
    }

    /// Every notification pushed so far, expired or not.
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    /// Take all pending notifications, leaving the center empty.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// `[HH:MM:SS] message`
    #[must_use]
    pub fn line(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Timestamped record of what the controller did.
///
/// Every entry is also emitted as a `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "knca::activity", "{message}");
        self.entries.push(LogEntry {
            at: Local::now(),
            message,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}
