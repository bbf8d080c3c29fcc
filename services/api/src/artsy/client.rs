use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    ArtCatalog, Artist, Artwork, CatalogError, SearchPage, TokenCache, XAPP_TOKEN_HEADER,
};

/// HTTP client for the external art catalog
#[derive(Clone)]
pub struct ArtsyClient {
    http: reqwest::Client,
    base: Url,
    tokens: TokenCache,
}

/// Build the shared HTTP client used for every catalog call
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, CatalogError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

impl ArtsyClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        tokens: TokenCache,
    ) -> Result<Self, CatalogError> {
        let base = Url::parse(base_url).map_err(|e| CatalogError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::Url(base_url.to_string()));
        }

        Ok(Self { http, base, tokens })
    }

    /// Base URL extended with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let token = self.tokens.ensure_valid_token().await?;

        debug!("Catalog GET {}", url.path());
        let response = self
            .http
            .get(url)
            .header(XAPP_TOKEN_HEADER, token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!("Catalog rejected the application token, dropping it");
                self.tokens.invalidate().await;
            }

            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("message")?.as_str().map(str::to_string));

            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ArtCatalog for ArtsyClient {
    async fn artist(&self, id: &str) -> Result<Artist, CatalogError> {
        self.get_json(self.endpoint(&["artists", id])?).await
    }

    async fn artworks(&self, artist_id: &str, size: usize) -> Result<Value, CatalogError> {
        let mut url = self.endpoint(&["artworks"])?;
        url.query_pairs_mut()
            .append_pair("artist_id", artist_id)
            .append_pair("size", &size.to_string());
        self.get_json(url).await
    }

    async fn artwork(&self, id: &str) -> Result<Artwork, CatalogError> {
        self.get_json(self.endpoint(&["artworks", id])?).await
    }

    async fn follow(&self, href: &str) -> Result<Value, CatalogError> {
        let url = Url::parse(href).map_err(|e| CatalogError::Url(e.to_string()))?;
        if url.origin() != self.base.origin() {
            return Err(CatalogError::ForeignLink(href.to_string()));
        }
        self.get_json(url).await
    }

    async fn similar_artists(&self, artist_id: &str) -> Result<Value, CatalogError> {
        let mut url = self.endpoint(&["artists"])?;
        url.query_pairs_mut()
            .append_pair("similar_to_artist_id", artist_id);
        self.get_json(url).await
    }

    async fn search_artists(&self, query: &str, size: usize) -> Result<SearchPage, CatalogError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("size", &size.to_string())
            .append_pair("type", "artist");
        self.get_json(url).await
    }
}
