//! Transient user notifications (toasts)

use crate::constants::{ERROR_NOTIFICATION_TTL_MS, NOTIFICATION_TTL_MS};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

impl NotificationKind {
    /// How long a notification of this kind stays visible
    pub fn ttl_ms(&self) -> u64 {
        match self {
            NotificationKind::Success | NotificationKind::Info => NOTIFICATION_TTL_MS,
            NotificationKind::Error => ERROR_NOTIFICATION_TTL_MS,
        }
    }
}

/// A message shown to the user until it expires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub ttl_ms: u64,
}

impl Notification {
    /// Creates a notification with the default lifetime for its kind
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
            ttl_ms: kind.ttl_ms(),
        }
    }

    /// Point in time after which the notification is no longer shown
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::milliseconds(self.ttl_ms as i64)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Holds raised notifications until they expire
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises a notification and returns a copy of it
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let notification = Notification::new(kind, message);
        self.items.push(notification.clone());
        notification
    }

    /// Notifications still visible at `now`, oldest first
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        self.items
            .iter()
            .filter(|n| !n.is_expired(now))
            .cloned()
            .collect()
    }

    /// Drops expired notifications
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.items.retain(|n| !n.is_expired(now));
    }

    /// Removes a notification before it expires
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
