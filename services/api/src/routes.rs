//! API service routes

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_extra::extract::CookieJar;
use common::models::{
    AddFavoriteRequest, FavoritesResponse, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};
use serde::Deserialize;
use serde_json::json;
use std::path::Path as FsPath;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    settings::ServerSettings,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/delete", delete(delete_account))
        .route("/api/me", get(me))
        .route("/api/favorites", get(list_favorites))
        .route(
            "/api/favorite/:artist_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/api/similar/:artist_id", get(similar_artists))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/artist/:id", get(artist))
        .route("/api/artworks/:id", get(artworks))
        .route("/api/categories/:artwork_id", get(categories))
        .route("/api/search", get(search))
        .merge(protected_routes)
        .with_state(state)
}

/// Full application: API routes, CORS, request tracing and, when the bundle
/// directory exists, the single-page client with an `index.html` fallback.
pub fn create_app(state: AppState, settings: &ServerSettings) -> Router {
    let mut app = create_router(state);

    if let Some(dir) = settings
        .static_dir
        .as_deref()
        .map(FsPath::new)
        .filter(|dir| dir.is_dir())
    {
        info!("Serving client bundle from {}", dir.display());
        app = app.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        );
    }

    app.layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Credentialed CORS for the configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "artfolio-api"
    }))
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    state.accounts.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registered successfully")),
    ))
}

/// Check credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let user = state.accounts.login(request).await?;

    let token = state.sessions.issue(user.id).map_err(|e| {
        error!("Failed to issue session: {}", e);
        ApiError::Internal
    })?;

    Ok((
        jar.add(state.sessions.cookie(token)),
        Json(LoginResponse {
            message: "Logged in".to_string(),
            user,
        }),
    ))
}

/// End the session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(state.sessions.removal_cookie()),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Delete the signed-in account and end its session
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> ApiResult<impl IntoResponse> {
    state.accounts.delete(user.id).await?;

    Ok((
        jar.add(state.sessions.removal_cookie()),
        Json(MessageResponse::new("Account deleted successfully")),
    ))
}

/// Profile of the signed-in user
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.profile(user.id).await?))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let favorites = state.favorites.list(user.id).await?;
    Ok(Json(FavoritesResponse { favorites }))
}

/// Add an artist to the favorites; the body is optional
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(artist_id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        AddFavoriteRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::Validation(e.to_string()))?
    };

    state.favorites.add(user.id, &artist_id, request).await?;

    Ok(Json(MessageResponse::new("Added to favorites")))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(artist_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.favorites.remove(user.id, &artist_id).await?;
    Ok(Json(MessageResponse::new("Removed from favorites")))
}

pub async fn artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.artist(&id).await?))
}

pub async fn artworks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.artworks(&id).await?))
}

pub async fn categories(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.categories(&artwork_id).await?))
}

pub async fn similar_artists(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.similar(&artist_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    Ok(Json(state.catalog.search(params.q.as_deref()).await?))
}
