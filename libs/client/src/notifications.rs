//! Transient user-facing notifications

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::sync::watch;
use tracing::warn;

/// How long a notification stays visible
pub const AUTO_DISMISS: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

struct Inner {
    tx: watch::Sender<Vec<Notification>>,
    next_id: AtomicU64,
}

/// Stack of visible notifications, newest first
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<Inner>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                tx,
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Show a notification and schedule its removal after [`AUTO_DISMISS`].
    ///
    /// Outside a Tokio runtime the notification stays until dismissed.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
        };
        self.inner.tx.send_modify(|list| list.insert(0, notification));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let this = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(AUTO_DISMISS).await;
                    this.dismiss(id);
                });
            }
            Err(_) => warn!("No runtime to auto-dismiss notification {}", id),
        }

        id
    }

    pub fn dismiss(&self, id: u64) {
        self.inner.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        });
    }

    pub fn current(&self) -> Vec<Notification> {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(notifications: &Notifications) -> Vec<String> {
        notifications
            .current()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_newest_first_with_increasing_ids() {
        let notifications = Notifications::new();
        let first = notifications.show("Logged in", NotificationKind::Success);
        let second = notifications.show("Added to favorites", NotificationKind::Success);

        assert!(second > first);
        assert_eq!(messages(&notifications), ["Added to favorites", "Logged in"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_after_three_seconds() {
        let notifications = Notifications::new();
        notifications.show("Removed from favorites", NotificationKind::Danger);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(notifications.current().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(notifications.current().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_notifies_once() {
        let notifications = Notifications::new();
        let id = notifications.show("Account deleted", NotificationKind::Danger);
        let mut rx = notifications.subscribe();

        notifications.dismiss(id);
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        notifications.dismiss(id);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_show_without_runtime_keeps_notification() {
        let notifications = Notifications::new();
        notifications.show("Logged Out", NotificationKind::Success);
        assert_eq!(messages(&notifications), ["Logged Out"]);
    }
}
