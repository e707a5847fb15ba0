//! crates/chore_tracker_core/src/nudge.rs
//!
//! Reminds a member about their pending chores through the notification port.

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Member, Notification, NotificationPermission};
use crate::ports::{NotificationService, PortResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NudgeOutcome {
    /// Handed to the host notification system.
    Delivered { notification: Notification },
    /// Permission was requested and not granted. Nothing was shown.
    PermissionRefused,
    /// Notifications are unavailable; show this message instead.
    Fallback { message: String },
}

pub fn nudge_notification(member: &Member, pending: usize) -> Notification {
    Notification {
        title: format!("Nudge for {}! 📢", member.name),
        body: format!("You have {pending} pending chore(s)!"),
        icon: member.avatar.clone(),
        tag: format!("nudge-{}", member.id),
    }
}

pub fn fallback_message(member: &Member, pending: usize) -> String {
    format!(
        "📢 Nudge sent to {}! They have {pending} pending chore(s).",
        member.name
    )
}

/// Sends the nudge according to the current permission state. An undecided
/// permission is requested once; there is no retry.
pub async fn deliver(
    notifier: &dyn NotificationService,
    member: &Member,
    pending: usize,
) -> PortResult<NudgeOutcome> {
    let notification = nudge_notification(member, pending);
    let permission = match notifier.permission().await {
        NotificationPermission::Default => {
            debug!(member_id = %member.id, "Requesting notification permission");
            match notifier.request_permission().await? {
                NotificationPermission::Granted => NotificationPermission::Granted,
                _ => return Ok(NudgeOutcome::PermissionRefused),
            }
        }
        other => other,
    };

    match permission {
        NotificationPermission::Granted => {
            notifier.notify(&notification).await?;
            info!(member_id = %member.id, tag = %notification.tag, "Nudge delivered");
            Ok(NudgeOutcome::Delivered { notification })
        }
        _ => Ok(NudgeOutcome::Fallback {
            message: fallback_message(member, pending),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationPermission as P;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubNotifier {
        current: NotificationPermission,
        on_request: NotificationPermission,
        sent: Mutex<Vec<Notification>>,
    }

    impl StubNotifier {
        fn new(current: NotificationPermission, on_request: NotificationPermission) -> Self {
            Self {
                current,
                on_request,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationService for StubNotifier {
        async fn permission(&self) -> NotificationPermission {
            self.current
        }

        async fn request_permission(&self) -> PortResult<NotificationPermission> {
            Ok(self.on_request)
        }

        async fn notify(&self, notification: &Notification) -> PortResult<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn alice() -> Member {
        Member {
            id: "17".into(),
            name: "Alice".to_string(),
            avatar: "👩".to_string(),
        }
    }

    #[tokio::test]
    async fn granted_permission_delivers_tagged_notification() {
        let notifier = StubNotifier::new(P::Granted, P::Denied);
        let outcome = deliver(&notifier, &alice(), 2).await.unwrap();

        let sent = notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Nudge for Alice! 📢");
        assert_eq!(sent[0].body, "You have 2 pending chore(s)!");
        assert_eq!(sent[0].tag, "nudge-17");
        assert_eq!(outcome, NudgeOutcome::Delivered { notification: sent[0].clone() });
    }

    #[tokio::test]
    async fn undecided_permission_is_requested_once() {
        let granted_later = StubNotifier::new(P::Default, P::Granted);
        assert!(matches!(
            deliver(&granted_later, &alice(), 1).await.unwrap(),
            NudgeOutcome::Delivered { .. }
        ));

        let refused = StubNotifier::new(P::Default, P::Denied);
        assert_eq!(deliver(&refused, &alice(), 1).await.unwrap(), NudgeOutcome::PermissionRefused);
        assert!(refused.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn denied_permission_falls_back_to_message() {
        let notifier = StubNotifier::new(P::Denied, P::Granted);
        let outcome = deliver(&notifier, &alice(), 3).await.unwrap();
        assert_eq!(
            outcome,
            NudgeOutcome::Fallback {
                message: "📢 Nudge sent to Alice! They have 3 pending chore(s).".to_string()
            }
        );
    }
}
