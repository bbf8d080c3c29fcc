//! Read-only catalog lookups exposed to the client

use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::{
    artsy::{ArtCatalog, Artist, CatalogError, SearchResult},
    error::{ApiError, ApiResult},
    validation::validate_search_query,
};

/// Number of artworks returned per artist
pub const ARTWORKS_PAGE_SIZE: usize = 10;

/// Maximum number of search results returned
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Replace the non-breaking space with a plain space and the dash variants
/// U+0096, U+2012, U+2013 and U+2014 with `-`. Absent text becomes "".
pub fn normalize_biography(biography: Option<&str>) -> String {
    biography
        .unwrap_or_default()
        .chars()
        .map(|c| match c {
            '\u{00A0}' => ' ',
            '\u{0096}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect()
}

/// Map a catalog failure to a generic error carrying `message`
fn upstream(message: &'static str) -> impl FnOnce(CatalogError) -> ApiError {
    move |e| {
        error!("{}: {}", message, e);
        ApiError::Upstream(message)
    }
}

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn ArtCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn ArtCatalog>) -> Self {
        Self { catalog }
    }

    /// Artist detail with its biography normalized.
    ///
    /// An upstream error status is relayed together with the upstream message.
    pub async fn artist(&self, id: &str) -> ApiResult<Artist> {
        let mut artist = self.catalog.artist(id).await.map_err(|e| match e {
            CatalogError::Status { status, message } => ApiError::UpstreamStatus {
                status: StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            },
            other => {
                error!("Failed to fetch artist: {}", other);
                ApiError::Internal
            }
        })?;

        if artist.biography.is_some() {
            artist.biography = Some(normalize_biography(artist.biography.as_deref()));
        }

        Ok(artist)
    }

    pub async fn artworks(&self, artist_id: &str) -> ApiResult<Value> {
        self.catalog
            .artworks(artist_id, ARTWORKS_PAGE_SIZE)
            .await
            .map_err(upstream("Failed to fetch artworks"))
    }

    /// Categories ("genes") of an artwork, reached through the artwork's `genes` link
    pub async fn categories(&self, artwork_id: &str) -> ApiResult<Value> {
        let artwork = self
            .catalog
            .artwork(artwork_id)
            .await
            .map_err(upstream("Error fetching categories"))?;

        let href = artwork.links.href("genes").ok_or_else(|| {
            ApiError::NotFound("No categories found for this artwork".to_string())
        })?;

        self.catalog
            .follow(href)
            .await
            .map_err(upstream("Error fetching categories"))
    }

    pub async fn similar(&self, artist_id: &str) -> ApiResult<Value> {
        self.catalog
            .similar_artists(artist_id)
            .await
            .map_err(upstream("Error fetching similar artists"))
    }

    /// Artist search; a blank query is rejected before the catalog is contacted
    pub async fn search(&self, query: Option<&str>) -> ApiResult<Vec<SearchResult>> {
        let term = validate_search_query(query).map_err(ApiError::Validation)?;

        let page = self
            .catalog
            .search_artists(term, SEARCH_PAGE_SIZE)
            .await
            .map_err(upstream("Search failed"))?;

        Ok(page
            .into_results()
            .into_iter()
            .filter(SearchResult::is_artist)
            .take(SEARCH_PAGE_SIZE)
            .collect())
    }
}
