use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Non-blocking toast queue. Pending toasts stay until dismissed or drained.
#[derive(Debug, Default)]
pub struct Notifier {
    queue: Mutex<Vec<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.push(NotificationLevel::Info, message.into())
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(NotificationLevel::Success, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.push(NotificationLevel::Error, message.into())
    }

    fn push(&self, level: NotificationLevel, message: String) -> String {
        match level {
            NotificationLevel::Error => tracing::warn!(message = %message, "error notification"),
            _ => tracing::info!(message = %message, "notification"),
        }

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            level,
            message,
            created_at: Utc::now(),
        };
        let id = notification.id.clone();
        // A poisoned queue only loses toasts; keep going with the inner value.
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.push(notification);
        id
    }

    pub fn pending(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn dismiss(&self, id: &str) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = queue.len();
        queue.retain(|entry| entry.id != id);
        queue.len() != before
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *queue)
    }

    pub fn last_message(&self) -> Option<String> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .map(|entry| entry.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationLevel, Notifier};

    #[test]
    fn dismiss_removes_only_the_named_toast() {
        let notifier = Notifier::new();
        let first = notifier.success("Task added");
        notifier.error("Failed to connect calendar");

        assert!(notifier.dismiss(&first));
        assert!(!notifier.dismiss(&first));

        let pending = notifier.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].level, NotificationLevel::Error);
    }

    #[test]
    fn drain_empties_the_queue() {
        let notifier = Notifier::new();
        notifier.info("Listening... Speak now");
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.pending().is_empty());
    }
}
