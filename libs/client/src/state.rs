//! Observable "current user" state

use common::models::{UserProfile, remove_favorite};
use std::sync::Arc;
use tokio::sync::watch;

/// Holder of the signed-in user, if any.
///
/// Clones share the same state. Every mutation notifies all subscribers,
/// whether or not the value actually changed.
#[derive(Clone)]
pub struct UserState {
    tx: Arc<watch::Sender<Option<UserProfile>>>,
}

impl Default for UserState {
    fn default() -> Self {
        Self::new()
    }
}

impl UserState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn set_user(&self, user: UserProfile) {
        self.tx.send_replace(Some(user));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Receiver that observes every later change
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.tx.subscribe()
    }

    pub fn is_favorite(&self, artist_id: &str) -> bool {
        self.tx
            .borrow()
            .as_ref()
            .is_some_and(|user| user.favorites.iter().any(|f| f.id == artist_id))
    }

    /// Drop a favorite locally, ahead of the next profile refresh
    pub fn remove_favorite(&self, artist_id: &str) {
        self.tx.send_modify(|user| {
            if let Some(user) = user {
                remove_favorite(&mut user.favorites, artist_id);
            }
        });
    }
}
