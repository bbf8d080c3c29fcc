//! Service settings loaded from defaults, an optional `artfolio.toml`, and
//! `ARTFOLIO__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// HTTP listener and hosting settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory holding the built single-page client, if any
    pub static_dir: Option<String>,
    /// Origins allowed to make credentialed cross-origin requests
    #[serde(deserialize_with = "origin_list")]
    pub allowed_origins: Vec<String>,
}

/// Accept origins either as a list or as one comma separated string
fn origin_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        Joined(String),
        List(Vec<String>),
    }

    let origins = match Origins::deserialize(deserializer)? {
        Origins::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        Origins::List(list) => list,
    };

    Ok(origins
        .into_iter()
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect())
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session cookie settings
#[derive(Clone, Deserialize)]
pub struct SessionSettings {
    /// HMAC secret used to sign session tokens
    pub secret: String,
    /// Session lifetime in seconds
    pub ttl_secs: u64,
    /// Mark the cookie `Secure`
    pub secure_cookie: bool,
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

/// External art catalog credentials
#[derive(Clone, Deserialize)]
pub struct ArtsySettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for ArtsySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtsySettings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub session: SessionSettings,
    pub artsy: ArtsySettings,
}

impl Settings {
    /// Load settings
    ///
    /// # Environment Variables
    /// - `ARTFOLIO__SERVER__HOST` / `ARTFOLIO__SERVER__PORT` (default: 0.0.0.0:3000)
    /// - `ARTFOLIO__SERVER__STATIC_DIR` (default: public/browser)
    /// - `ARTFOLIO__SERVER__ALLOWED_ORIGINS`: comma separated (default: http://localhost:4200)
    /// - `ARTFOLIO__SESSION__SECRET`: required
    /// - `ARTFOLIO__SESSION__TTL_SECS` (default: 3600)
    /// - `ARTFOLIO__ARTSY__CLIENT_ID` / `ARTFOLIO__ARTSY__CLIENT_SECRET`: required
    /// - `ARTFOLIO__ARTSY__BASE_URL` (default: https://api.artsy.net/api)
    /// - `ARTFOLIO__ARTSY__REQUEST_TIMEOUT_SECS` (default: 30)
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.static_dir", "public/browser")?
            .set_default("server.allowed_origins", "http://localhost:4200")?
            .set_default("session.ttl_secs", 3600)?
            .set_default("session.secure_cookie", false)?
            .set_default("artsy.base_url", "https://api.artsy.net/api")?
            .set_default("artsy.request_timeout_secs", 30)?
            .add_source(File::with_name("artfolio").required(false))
            .add_source(
                Environment::with_prefix("ARTFOLIO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Browsers refuse credentialed responses to a wildcard origin
        if self.server.allowed_origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::Message(
                "server.allowed_origins cannot contain \"*\" because credentials are allowed; \
                 list each origin explicitly"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
