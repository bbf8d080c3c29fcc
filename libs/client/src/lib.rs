//! Client core for the Artfolio API
//!
//! Everything a front end needs besides rendering: a typed REST client that
//! keeps the session cookie, an observable current-user state, transient
//! notifications, and the display helpers used by the favorites view.

pub mod api;
pub mod error;
pub mod format;
pub mod notifications;
pub mod session;
pub mod state;

pub use crate::api::ApiClient;
pub use error::ClientError;
pub use notifications::{Notification, NotificationKind, Notifications};
pub use session::Session;
pub use state::UserState;
