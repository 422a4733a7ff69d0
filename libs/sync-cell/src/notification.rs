use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

pub const ROLLBACK_MESSAGE: &str = "Gagal menyimpan. Perubahan dibatalkan.";
pub const SAVED_MESSAGE: &str = "Perubahan tersimpan.";

const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A user-facing toast.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub action: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(action: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            action: action.to_string(),
            message: SAVED_MESSAGE.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn error(action: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            action: action.to_string(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Bounded in-memory toast queue; the oldest toast is dropped when full.
pub struct ToastLog {
    entries: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for ToastLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub async fn drain(&self) -> Vec<Notification> {
        self.entries.lock().await.drain(..).collect()
    }

    pub async fn recent(&self) -> Vec<Notification> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl Notifier for ToastLog {
    async fn notify(&self, notification: Notification) {
        let mut entries = self.entries.lock().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
    }
}
