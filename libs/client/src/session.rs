//! Account and favorites flows as seen by a front end
//!
//! Each flow calls the API, updates [`UserState`] and posts the matching
//! notification, so views only need to observe state.

use common::models::{Favorite, LoginRequest, RegisterRequest, UserProfile};
use tracing::{debug, info};

use crate::{
    api::ApiClient,
    error::ClientResult,
    notifications::{NotificationKind, Notifications},
    state::UserState,
};

#[derive(Clone)]
pub struct Session {
    api: ApiClient,
    user: UserState,
    notifications: Notifications,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: UserState::new(),
            notifications: Notifications::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> &UserState {
        &self.user
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Reload the signed-in user from the server.
    ///
    /// A rejected or unknown session signs the user out locally and yields `None`.
    pub async fn restore(&self) -> ClientResult<Option<UserProfile>> {
        match self.api.profile().await {
            Ok(profile) => {
                self.user.set_user(profile.clone());
                Ok(Some(profile))
            }
            Err(e) if e.is_session_error() => {
                debug!("No active session: {}", e);
                self.user.clear();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<()> {
        self.api
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserProfile> {
        let response = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!("Signed in as {}", response.user.email);
        self.user.set_user(response.user.clone());
        self.notifications
            .show("Logged in", NotificationKind::Success);
        Ok(response.user)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.api.logout().await?;
        self.user.clear();
        self.notifications
            .show("Logged Out", NotificationKind::Success);
        Ok(())
    }

    pub async fn delete_account(&self) -> ClientResult<()> {
        self.api.delete_account().await?;
        self.user.clear();
        self.notifications
            .show("Account deleted", NotificationKind::Danger);
        Ok(())
    }

    /// Favorite or unfavorite an artist, returning whether it is now a favorite
    pub async fn toggle_favorite(&self, artist_id: &str) -> ClientResult<bool> {
        let now_favorite = if self.user.is_favorite(artist_id) {
            self.api.remove_favorite(artist_id).await?;
            self.notifications
                .show("Removed from favorites", NotificationKind::Danger);
            false
        } else {
            self.api.add_favorite(artist_id).await?;
            self.notifications
                .show("Added to favorites", NotificationKind::Success);
            true
        };

        self.restore().await?;
        Ok(now_favorite)
    }

    /// Unfavorite from the favorites view, updating local state right away
    pub async fn remove_favorite(&self, artist_id: &str) -> ClientResult<()> {
        self.api.remove_favorite(artist_id).await?;
        self.user.remove_favorite(artist_id);
        self.notifications
            .show("Removed from favorites", NotificationKind::Danger);
        Ok(())
    }

    /// Favorites of the signed-in user, newest first
    pub async fn favorites(&self) -> ClientResult<Vec<Favorite>> {
        self.api.favorites().await
    }
}
