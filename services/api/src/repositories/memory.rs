//! In-process user store
//!
//! Mirrors the Postgres store's semantics without a database, for tests and
//! local runs.

use async_trait::async_trait;
use chrono::Utc;
use common::models::{Favorite, FavoriteInsert, insert_favorite, remove_favorite};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// User store kept in a shared map
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|user| user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar: new_user.avatar,
            favorites: Vec::new(),
            created_at: Utc::now(),
        };
        info!("Created user {} in memory store", user.id);
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn add_favorite(
        &self,
        user_id: Uuid,
        favorite: Favorite,
    ) -> Result<FavoriteInsert, StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        Ok(insert_favorite(&mut user.favorites, favorite))
    }

    async fn remove_favorite(&self, user_id: Uuid, artist_id: &str) -> Result<(), StoreError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            remove_favorite(&mut user.favorites, artist_id);
        }
        Ok(())
    }

    async fn favorites(&self, user_id: Uuid) -> Result<Option<Vec<Favorite>>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|user| user.favorites.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            avatar: "avatar".to_string(),
        }
    }

    fn favorite(id: &str) -> Favorite {
        Favorite {
            id: id.to_string(),
            name: id.to_string(),
            image_url: String::new(),
            added_at: Utc::now(),
            birthday: String::new(),
            deathday: String::new(),
            nationality: String::new(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.create(new_user("ada@example.com")).await.unwrap();

        let second = store.create(new_user("ada@example.com")).await;
        assert!(matches!(second, Err(StoreError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_favorites_have_set_semantics() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();

        assert_eq!(
            store.add_favorite(user.id, favorite("a")).await.unwrap(),
            FavoriteInsert::Added
        );
        assert_eq!(
            store.add_favorite(user.id, favorite("a")).await.unwrap(),
            FavoriteInsert::AlreadyPresent
        );
        store.remove_favorite(user.id, "never-added").await.unwrap();

        let favorites = store.favorites(user.id).await.unwrap().unwrap();
        assert_eq!(favorites.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_favorites() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        store.add_favorite(user.id, favorite("a")).await.unwrap();

        assert!(store.delete(user.id).await.unwrap());
        assert!(store.favorites(user.id).await.unwrap().is_none());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(matches!(
            store.add_favorite(user.id, favorite("b")).await,
            Err(StoreError::UserNotFound)
        ));
    }
}
