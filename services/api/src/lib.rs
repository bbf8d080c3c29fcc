//! Artfolio API service
//!
//! REST backend for browsing an external art catalog and keeping a personal
//! list of favorite artists behind cookie-based sessions.

pub mod accounts;
pub mod artsy;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod settings;
pub mod state;
pub mod validation;

pub use state::AppState;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
