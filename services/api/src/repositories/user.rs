//! User repository for database operations

use async_trait::async_trait;
use common::models::{Favorite, FavoriteInsert};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// Postgres-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_favorites(&self, user_id: Uuid) -> Result<Vec<Favorite>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT artist_id, name, image_url, birthday, deathday, nationality, added_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(favorite_from_row).collect())
    }

    async fn with_favorites(&self, row: Option<PgRow>) -> Result<Option<User>, StoreError> {
        match row {
            Some(row) => {
                let mut user = user_from_row(&row);
                user.favorites = self.load_favorites(user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        avatar: row.get("avatar"),
        favorites: Vec::new(),
        created_at: row.get("created_at"),
    }
}

fn favorite_from_row(row: &PgRow) -> Favorite {
    Favorite {
        id: row.get("artist_id"),
        name: row.get("name"),
        image_url: row.get("image_url"),
        added_at: row.get("added_at"),
        birthday: row.get("birthday"),
        deathday: row.get("deathday"),
        nationality: row.get("nationality"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        info!("Creating new user: {}", new_user.email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, avatar, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        })?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.with_favorites(row).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, avatar, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_favorites(row).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        info!("Deleting user: {}", id);

        // favorites go with the user through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_favorite(
        &self,
        user_id: Uuid,
        favorite: Favorite,
    ) -> Result<FavoriteInsert, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites
                (user_id, artist_id, name, image_url, birthday, deathday, nationality, added_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, artist_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&favorite.id)
        .bind(&favorite.name)
        .bind(&favorite.image_url)
        .bind(&favorite.birthday)
        .bind(&favorite.deathday)
        .bind(&favorite.nationality)
        .bind(favorite.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::UserNotFound
            }
            other => StoreError::Database(other),
        })?;

        if result.rows_affected() > 0 {
            Ok(FavoriteInsert::Added)
        } else {
            Ok(FavoriteInsert::AlreadyPresent)
        }
    }

    async fn remove_favorite(&self, user_id: Uuid, artist_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND artist_id = $2")
            .bind(user_id)
            .bind(artist_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn favorites(&self, user_id: Uuid) -> Result<Option<Vec<Favorite>>, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Ok(None);
        }

        Ok(Some(self.load_favorites(user_id).await?))
    }
}
