//! JSON wire models shared by the API service and its clients

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod favorite;

pub use favorite::{Favorite, FavoriteInsert, insert_favorite, newest_first, remove_favorite};

/// Public view of an account, as returned by `/api/me` and `/api/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    /// Newest first
    #[serde(default)]
    pub favorites: Vec<Favorite>,
}

/// Request for account registration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user login
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Generic acknowledgement body, also used for error payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response for the favorites listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
}

/// Optional body of `POST /api/favorite/:artistId`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    /// RFC 3339 timestamp chosen by the client
    #[serde(rename = "addedAt", default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}
