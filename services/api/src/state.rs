//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    accounts::AccountService, artsy::ArtCatalog, catalog::CatalogService,
    favorites::FavoritesService, repositories::UserStore, session::SessionService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub favorites: FavoritesService,
    pub catalog: CatalogService,
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        catalog: Arc<dyn ArtCatalog>,
        sessions: SessionService,
    ) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            favorites: FavoritesService::new(store, catalog.clone()),
            catalog: CatalogService::new(catalog),
            sessions,
        }
    }
}
