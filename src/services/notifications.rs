use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationColor {
    Default,
    Red,
}

/// Transient message shown to the user
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub color: NotificationColor,
    pub created_at: DateTime<Utc>,
}

/// Process-local queue of pending notifications
#[derive(Debug, Default, Clone)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, color: NotificationColor) {
        let notification = Notification {
            message: message.into(),
            color,
            created_at: Utc::now(),
        };
        tracing::debug!(message = %notification.message, "Notification queued");
        self.pending.push_back(notification);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, NotificationColor::Red);
    }

    /// Most recent notification, if any
    pub fn latest(&self) -> Option<&Notification> {
        self.pending.back()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every pending notification, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_in_order_and_empties() {
        let mut queue = NotificationQueue::new();
        queue.show("first", NotificationColor::Default);
        queue.error("second");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.latest().unwrap().message, "second");

        let drained = queue.drain();
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].color, NotificationColor::Red);
        assert!(queue.is_empty());
    }
}
