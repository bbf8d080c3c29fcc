//! Credential store: persistence of accounts and their favorites

use async_trait::async_trait;
use common::models::{Favorite, FavoriteInsert};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod memory;
pub mod user;

pub use memory::MemoryUserStore;
pub use user::PgUserStore;

/// Errors raised by a [`UserStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// An account with this email already exists
    #[error("email already registered")]
    DuplicateEmail,

    /// The referenced account does not exist
    #[error("user not found")]
    UserNotFound,

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Keyed store of user records and their favorites lists.
///
/// Implementations must give favorites set semantics keyed by artist id and
/// must remove a user's favorites together with the user.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new account; fails with [`StoreError::DuplicateEmail`] if the email is taken
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Find an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Find an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Delete an account and its favorites, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Add a favorite unless one with the same artist id is already stored
    async fn add_favorite(
        &self,
        user_id: Uuid,
        favorite: Favorite,
    ) -> Result<FavoriteInsert, StoreError>;

    /// Remove any favorite with `artist_id`; absent entries are not an error
    async fn remove_favorite(&self, user_id: Uuid, artist_id: &str) -> Result<(), StoreError>;

    /// Favorites of a user in insertion order, or `None` for an unknown user
    async fn favorites(&self, user_id: Uuid) -> Result<Option<Vec<Favorite>>, StoreError>;
}
