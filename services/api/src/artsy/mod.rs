//! Integration with the external art catalog API
//!
//! Every call is authorised with an application token obtained from the
//! catalog's own token endpoint and cached process-wide by [`TokenCache`].
//! Response payloads are deserialised into boundary schemas that name the
//! fields this service relies on and carry every other field through
//! untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod token;

pub use client::{ArtsyClient, http_client};
pub use token::{ArtsyTokenIssuer, TokenCache, TokenIssuer, XappToken};

/// Header carrying the application token on every catalog request
pub const XAPP_TOKEN_HEADER: &str = "X-XAPP-Token";

/// Errors raised while talking to the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No valid application token could be obtained
    #[error("catalog token unavailable: {0}")]
    TokenUnavailable(String),

    /// The catalog answered with a non-success status
    #[error("catalog responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// The request never completed
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A link pointed somewhere this client refuses to follow
    #[error("refusing to follow link: {0}")]
    ForeignLink(String),

    /// A request URL could not be built
    #[error("invalid catalog url: {0}")]
    Url(String),
}

/// HAL `_links` section of a catalog resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HalLinks(BTreeMap<String, Value>);

impl HalLinks {
    /// Non-empty `href` of the link relation `rel`
    pub fn href(&self, rel: &str) -> Option<&str> {
        self.0
            .get(rel)?
            .get("href")?
            .as_str()
            .filter(|href| !href.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HalLinks {
    fn from(links: [(&str, &str); N]) -> Self {
        Self(
            links
                .into_iter()
                .map(|(rel, href)| (rel.to_string(), serde_json::json!({ "href": href })))
                .collect(),
        )
    }
}

/// Artist resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deathday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Artwork resource; only its links matter here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One hit of a catalog search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn is_artist(&self) -> bool {
        self.kind.as_deref() == Some("artist")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEmbedded {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<SearchEmbedded>,
}

impl SearchPage {
    pub fn into_results(self) -> Vec<SearchResult> {
        self.embedded.map(|e| e.results).unwrap_or_default()
    }
}

/// Read-only lookups against the art catalog.
///
/// Implementations are responsible for authorising each call.
#[async_trait]
pub trait ArtCatalog: Send + Sync {
    /// Fetch one artist
    async fn artist(&self, id: &str) -> Result<Artist, CatalogError>;

    /// Fetch up to `size` artworks by an artist
    async fn artworks(&self, artist_id: &str, size: usize) -> Result<Value, CatalogError>;

    /// Fetch one artwork
    async fn artwork(&self, id: &str) -> Result<Artwork, CatalogError>;

    /// Fetch the resource behind a link found in a catalog payload
    async fn follow(&self, href: &str) -> Result<Value, CatalogError>;

    /// Fetch artists similar to the given one
    async fn similar_artists(&self, artist_id: &str) -> Result<Value, CatalogError>;

    /// Search restricted to artists
    async fn search_artists(&self, query: &str, size: usize) -> Result<SearchPage, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artist_keeps_unknown_fields() {
        let payload = json!({
            "id": "4d8b92b34eb68a1b2c0003f4",
            "name": "Pablo Picasso",
            "birthday": "1881",
            "deathday": null,
            "hometown": "Málaga, Spain",
            "_links": {
                "thumbnail": { "href": "https://d32dm0rphc51dk.cloudfront.net/x/four_thirds.jpg" }
            }
        });

        let artist: Artist = serde_json::from_value(payload).unwrap();
        assert_eq!(artist.name.as_deref(), Some("Pablo Picasso"));
        assert_eq!(artist.deathday, None);
        assert_eq!(
            artist.links.href("thumbnail"),
            Some("https://d32dm0rphc51dk.cloudfront.net/x/four_thirds.jpg")
        );

        let back = serde_json::to_value(&artist).unwrap();
        assert_eq!(back["hometown"], json!("Málaga, Spain"));
        assert!(back.get("biography").is_none());
    }

    #[test]
    fn test_href_ignores_missing_and_empty_links() {
        let links: HalLinks = serde_json::from_value(json!({
            "genes": { "href": "" },
            "self": { "templated": false }
        }))
        .unwrap();

        assert_eq!(links.href("genes"), None);
        assert_eq!(links.href("self"), None);
        assert_eq!(links.href("thumbnail"), None);
    }

    #[test]
    fn test_search_page_without_embedded_is_empty() {
        let page: SearchPage = serde_json::from_value(json!({ "total_count": 0 })).unwrap();
        assert!(page.into_results().is_empty());
    }

    #[test]
    fn test_search_result_type_round_trips() {
        let result: SearchResult =
            serde_json::from_value(json!({ "type": "artist", "title": "Banksy" })).unwrap();
        assert!(result.is_artist());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "type": "artist", "title": "Banksy" })
        );
    }
}
