//! Scripted in-process catalog for unit tests

use async_trait::async_trait;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::{
    ArtCatalog, Artist, Artwork, CatalogError, HalLinks, SearchEmbedded, SearchPage, SearchResult,
};

#[derive(Default)]
pub struct FakeCatalog {
    pub artists: HashMap<String, Artist>,
    pub artworks: HashMap<String, Artwork>,
    pub links: HashMap<String, Value>,
    pub search: Vec<SearchResult>,
    /// Answer every call with a 503
    pub unavailable: bool,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_artists(artists: impl IntoIterator<Item = Artist>) -> Self {
        Self {
            artists: artists.into_iter().map(|a| (a.id.clone(), a)).collect(),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(CatalogError::Status {
                status: 503,
                message: None,
            });
        }
        Ok(())
    }
}

fn not_found(message: &str) -> CatalogError {
    CatalogError::Status {
        status: 404,
        message: Some(message.to_string()),
    }
}

pub fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: Some(name.to_string()),
        birthday: Some("1900".to_string()),
        nationality: Some("French".to_string()),
        links: HalLinks::from([("thumbnail", "https://img.example.com/thumb.jpg")]),
        ..Default::default()
    }
}

pub fn search_hit(kind: &str, title: &str) -> SearchResult {
    let mut extra = serde_json::Map::new();
    extra.insert("title".to_string(), json!(title));
    SearchResult {
        kind: Some(kind.to_string()),
        extra,
    }
}

#[async_trait]
impl ArtCatalog for FakeCatalog {
    async fn artist(&self, id: &str) -> Result<Artist, CatalogError> {
        self.record()?;
        self.artists
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Artist Not Found"))
    }

    async fn artworks(&self, artist_id: &str, size: usize) -> Result<Value, CatalogError> {
        self.record()?;
        Ok(json!({ "artist_id": artist_id, "size": size }))
    }

    async fn artwork(&self, id: &str) -> Result<Artwork, CatalogError> {
        self.record()?;
        self.artworks
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Artwork Not Found"))
    }

    async fn follow(&self, href: &str) -> Result<Value, CatalogError> {
        self.record()?;
        self.links.get(href).cloned().ok_or_else(|| not_found("Not Found"))
    }

    async fn similar_artists(&self, artist_id: &str) -> Result<Value, CatalogError> {
        self.record()?;
        Ok(json!({ "similar_to_artist_id": artist_id }))
    }

    async fn search_artists(&self, _query: &str, _size: usize) -> Result<SearchPage, CatalogError> {
        self.record()?;
        Ok(SearchPage {
            embedded: Some(SearchEmbedded {
                results: self.search.clone(),
            }),
        })
    }
}
