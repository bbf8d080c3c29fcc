//! Favorites manager
//!
//! Snapshots artist metadata from the catalog into a user's favorites list.
//! The list is a set keyed by artist id and is always listed newest first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use common::models::{AddFavoriteRequest, Favorite, FavoriteInsert, newest_first};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    artsy::{ArtCatalog, Artist},
    error::{ApiError, ApiResult},
    repositories::UserStore,
};

/// Local date-time layouts accepted without an offset, read as UTC
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse the ISO 8601 forms a browser `Date` accepts: full RFC 3339, an
/// offset without seconds, a UTC or offset-less date-time, or a bare date.
fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(t.with_timezone(&Utc));
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(naive, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map(|t| t.and_utc())
}

/// Parse a client-supplied `addedAt`, defaulting to now
pub fn parse_added_at(raw: Option<&str>, now: DateTime<Utc>) -> ApiResult<DateTime<Utc>> {
    match raw {
        None => Ok(now),
        Some(raw) => parse_iso8601(raw.trim()).ok_or_else(|| {
            ApiError::Validation("addedAt must be an ISO 8601 timestamp.".to_string())
        }),
    }
}

/// Snapshot the parts of an artist kept in a favorites list
pub fn favorite_from_artist(artist: Artist, added_at: DateTime<Utc>) -> Favorite {
    let image_url = artist.links.href("thumbnail").unwrap_or_default().to_string();

    Favorite {
        id: artist.id,
        name: artist.name.unwrap_or_default(),
        image_url,
        added_at,
        birthday: artist.birthday.unwrap_or_default(),
        deathday: artist.deathday.unwrap_or_default(),
        nationality: artist.nationality.unwrap_or_default(),
    }
}

#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn UserStore>,
    catalog: Arc<dyn ArtCatalog>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn UserStore>, catalog: Arc<dyn ArtCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Add an artist to a user's favorites; adding it again is a no-op
    pub async fn add(
        &self,
        user_id: Uuid,
        artist_id: &str,
        request: AddFavoriteRequest,
    ) -> ApiResult<FavoriteInsert> {
        let added_at = parse_added_at(request.added_at.as_deref(), Utc::now())?;

        let artist = self.catalog.artist(artist_id).await.map_err(|e| {
            error!("Failed to fetch artist {} for favorites: {}", artist_id, e);
            ApiError::Upstream("Error adding to favorites")
        })?;

        let outcome = self
            .store
            .add_favorite(user_id, favorite_from_artist(artist, added_at))
            .await?;

        if outcome == FavoriteInsert::Added {
            info!("User {} favorited artist {}", user_id, artist_id);
        }

        Ok(outcome)
    }

    /// Remove an artist from a user's favorites; removing an absent one succeeds
    pub async fn remove(&self, user_id: Uuid, artist_id: &str) -> ApiResult<()> {
        self.store.remove_favorite(user_id, artist_id).await?;
        Ok(())
    }

    /// Favorites of a user, most recently added first
    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Favorite>> {
        let favorites = self
            .store
            .favorites(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(newest_first(favorites))
    }
}
