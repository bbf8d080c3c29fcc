//! Account registration, login and removal

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use common::models::{LoginRequest, RegisterRequest, UserProfile};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::NewUser,
    repositories::UserStore,
    validation::{validate_login, validate_registration},
};

/// Identicon avatar derived from the normalised email
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon",
        hex::encode(digest)
    )
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Internal
        })
}

fn verify_password(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create an account
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<()> {
        validate_registration(&request).map_err(ApiError::Validation)?;

        let user = self
            .store
            .create(NewUser {
                avatar: gravatar_url(&request.email),
                password_hash: hash_password(&request.password)?,
                name: request.name,
                email: request.email,
            })
            .await?;

        info!("Registered user {}", user.id);
        Ok(())
    }

    /// Check credentials, returning the matching profile
    pub async fn login(&self, request: LoginRequest) -> ApiResult<UserProfile> {
        validate_login(&request).map_err(ApiError::Validation)?;

        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .filter(|user| verify_password(&user.password_hash, &request.password))
            .ok_or_else(|| ApiError::Validation("Password or email is incorrect.".to_string()))?;

        info!("User {} logged in", user.id);
        Ok(user.into_profile())
    }

    /// Profile of the signed-in user, favorites newest first
    pub async fn profile(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(|user| user.into_profile())
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Delete an account together with its favorites
    pub async fn delete(&self, user_id: Uuid) -> ApiResult<()> {
        if !self.store.delete(user_id).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!("Deleted user {}", user_id);
        Ok(())
    }
}
