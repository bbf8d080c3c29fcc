//! Session tokens for cookie-based authentication
//!
//! A session is an HS256 JWT asserting a user id, valid for a fixed lifetime.
//! It carries no other claims and is delivered in an HTTP-only cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use uuid::Uuid;

use crate::settings::SessionSettings;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session expired")]
    Expired,

    #[error("invalid session token: {0}")]
    Invalid(String),

    #[error("failed to issue session token: {0}")]
    Encoding(String),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionService {
    keys: Arc<Keys>,
    validation: Validation,
    ttl_secs: u64,
    secure_cookie: bool,
}

fn now_secs() -> Result<u64, SessionError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| SessionError::Encoding(format!("Failed to get current time: {}", e)))
}

impl SessionService {
    /// Initialize a new session service
    pub fn new(settings: &SessionSettings) -> Result<Self, SessionError> {
        if settings.secret.is_empty() {
            return Err(SessionError::Encoding(
                "session secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
                decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            }),
            validation,
            ttl_secs: settings.ttl_secs,
            secure_cookie: settings.secure_cookie,
        })
    }

    /// Issue a session token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, SessionError> {
        let now = now_secs()?;
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| SessionError::Encoding("session lifetime overflows".to_string()))?;
        self.sign(&Claims {
            sub: user_id,
            iat: now,
            exp,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the user id
    pub fn verify(&self, token: &str) -> Result<Uuid, SessionError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid(e.to_string()),
            }
        })?;

        // jsonwebtoken accepts exp == now; a session is already dead at that instant
        if data.claims.exp <= now_secs()? {
            return Err(SessionError::Expired);
        }

        Ok(data.claims.sub)
    }

    /// Cookie carrying a freshly issued token
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .max_age(time_secs(self.ttl_secs))
            .build()
    }

    /// Expired, empty cookie that clears the session on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .path("/")
            .max_age(time::Duration::ZERO)
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

fn time_secs(secs: u64) -> time::Duration {
    time::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings {
            secret: "test-secret".to_string(),
            ttl_secs: 3600,
            secure_cookie: false,
        }
    }

    /// Sign arbitrary claims with the test secret
    fn forge(claims: &Claims) -> String {
        SessionService::new(&settings()).unwrap().sign(claims).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let service = SessionService::new(&settings()).unwrap();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = SessionService::new(&settings()).unwrap();
        let now = now_secs().unwrap();
        let token = forge(&Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 1,
        });

        assert!(matches!(service.verify(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn test_token_expiring_now_is_rejected() {
        let service = SessionService::new(&settings()).unwrap();
        let now = now_secs().unwrap();
        let token = forge(&Claims {
            sub: Uuid::new_v4(),
            iat: now - 3600,
            exp: now,
        });

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let service = SessionService::new(&settings()).unwrap();
        let other = SessionService::new(&SessionSettings {
            secret: "another-secret".to_string(),
            ..settings()
        })
        .unwrap();

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(service.verify(&token), Err(SessionError::Invalid(_))));
        assert!(matches!(service.verify("garbage"), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_empty_secret_is_refused() {
        let result = SessionService::new(&SessionSettings {
            secret: String::new(),
            ..settings()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_unbounded_lifetime_fails_to_issue() {
        let service = SessionService::new(&SessionSettings {
            ttl_secs: u64::MAX,
            ..settings()
        })
        .unwrap();

        assert!(matches!(
            service.issue(Uuid::new_v4()),
            Err(SessionError::Encoding(_))
        ));
    }

    #[test]
    fn test_cookie_attributes() {
        let service = SessionService::new(&settings()).unwrap();
        let cookie = service.cookie("abc".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time_secs(3600)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let service = SessionService::new(&settings()).unwrap();
        let cookie = service.removal_cookie();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
