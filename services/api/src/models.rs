//! Server-side account models

use chrono::{DateTime, Utc};
use common::models::{Favorite, UserProfile, newest_first};
use uuid::Uuid;

/// Stored account, including the password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    /// Insertion order
    pub favorites: Vec<Favorite>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view with favorites sorted newest first
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            favorites: newest_first(self.favorites),
        }
    }
}

/// New account creation payload, with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}
