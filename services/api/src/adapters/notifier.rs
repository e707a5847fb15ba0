//! services/api/src/adapters/notifier.rs
//!
//! A `NotificationService` for a headless server: notifications are written to
//! the log, and the permission state comes from configuration.

use async_trait::async_trait;
use chore_tracker_core::{Notification, NotificationPermission};
use chore_tracker_core::ports::{NotificationService, PortResult};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::info;

pub struct LogNotifier {
    permission: NotificationPermission,
    /// Tags already shown. A repeated tag replaces the earlier notification.
    shown: Mutex<HashSet<String>>,
}

impl LogNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission,
            shown: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl NotificationService for LogNotifier {
    async fn permission(&self) -> NotificationPermission {
        self.permission
    }

    async fn request_permission(&self) -> PortResult<NotificationPermission> {
        // Nobody can answer a prompt on a server, so it stays undecided.
        Ok(self.permission)
    }

    async fn notify(&self, notification: &Notification) -> PortResult<()> {
        let replaced = !self.shown.lock().await.insert(notification.tag.clone());
        info!(
            tag = %notification.tag,
            title = %notification.title,
            body = %notification.body,
            replaced,
            "Notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeated_tags_are_tracked_once() {
        let notifier = LogNotifier::new(NotificationPermission::Granted);
        let notification = Notification {
            title: "Nudge for Alice! 📢".to_string(),
            body: "You have 1 pending chore(s)!".to_string(),
            icon: "👩".to_string(),
            tag: "nudge-1".to_string(),
        };
        notifier.notify(&notification).await.unwrap();
        notifier.notify(&notification).await.unwrap();
        assert_eq!(notifier.shown.lock().await.len(), 1);
        assert_eq!(
            notifier.request_permission().await.unwrap(),
            NotificationPermission::Granted
        );
    }
}
