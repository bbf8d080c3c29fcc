//! Typed REST client for the Artfolio API

use chrono::Utc;
use common::models::{
    AddFavoriteRequest, Favorite, FavoritesResponse, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, UserProfile,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// REST client bound to one API base URL, e.g. `http://localhost:3000/api`.
///
/// Keeps cookies between calls, so a successful [`ApiClient::login`]
/// authenticates every later request made through the same client or its clones.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Url(base_url.to_string()));
        }

        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base })
    }

    /// Base URL extended with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url.path());
        Ok(self.http.request(method, url))
    }

    async fn read<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        Self::read(self.request(Method::GET, segments)?.send().await?).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        Self::read(self.request(method, segments)?.json(body).send().await?).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<MessageResponse> {
        self.send_json(Method::POST, &["register"], request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.send_json(Method::POST, &["login"], request).await
    }

    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        self.send_json(Method::POST, &["logout"], &serde_json::json!({}))
            .await
    }

    pub async fn delete_account(&self) -> ClientResult<MessageResponse> {
        Self::read(self.request(Method::DELETE, &["delete"])?.send().await?).await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        self.get(&["me"]).await
    }

    pub async fn favorites(&self) -> ClientResult<Vec<Favorite>> {
        let response: FavoritesResponse = self.get(&["favorites"]).await?;
        Ok(response.favorites)
    }

    /// Favorite an artist, stamped with the current time
    pub async fn add_favorite(&self, artist_id: &str) -> ClientResult<MessageResponse> {
        let body = AddFavoriteRequest {
            added_at: Some(Utc::now().to_rfc3339()),
        };
        self.send_json(Method::POST, &["favorite", artist_id], &body)
            .await
    }

    pub async fn remove_favorite(&self, artist_id: &str) -> ClientResult<MessageResponse> {
        Self::read(
            self.request(Method::DELETE, &["favorite", artist_id])?
                .send()
                .await?,
        )
        .await
    }

    pub async fn artist(&self, id: &str) -> ClientResult<Value> {
        self.get(&["artist", id]).await
    }

    pub async fn artworks(&self, artist_id: &str) -> ClientResult<Value> {
        self.get(&["artworks", artist_id]).await
    }

    pub async fn categories(&self, artwork_id: &str) -> ClientResult<Value> {
        self.get(&["categories", artwork_id]).await
    }

    pub async fn similar(&self, artist_id: &str) -> ClientResult<Value> {
        self.get(&["similar", artist_id]).await
    }

    pub async fn search(&self, query: &str) -> ClientResult<Vec<Value>> {
        let response = self
            .request(Method::GET, &["search"])?
            .query(&[("q", query)])
            .send()
            .await?;
        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = ApiClient::new("http://localhost:3000/api").unwrap();

        assert_eq!(
            client.endpoint(&["favorite", "4d8b92b34eb68a1b2c0003f4"]).unwrap().as_str(),
            "http://localhost:3000/api/favorite/4d8b92b34eb68a1b2c0003f4"
        );
        assert_eq!(
            client.endpoint(&["artist", "a b/c"]).unwrap().as_str(),
            "http://localhost:3000/api/artist/a%20b%2Fc"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_is_ignored() {
        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(
            client.endpoint(&["me"]).unwrap().as_str(),
            "http://localhost:3000/api/me"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(matches!(
            ApiClient::new("mailto:ada@example.com"),
            Err(ClientError::Url(_))
        ));
        assert!(ApiClient::new("not a url").is_err());
    }
}
