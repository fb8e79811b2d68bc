//! Session manager: opaque tokens carried in a signed, HTTP-only cookie.
//!
//! A session moves `Anonymous -> Authenticated(user) -> Anonymous`. Login creates a
//! record keyed by the token's SHA-256 digest with an absolute expiry 24 hours after
//! creation; logout deletes it. Expiry is checked lazily when a request presents
//! the token, and an expired record is removed at that point.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, CookieJar, Key, SameSite};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use super::Identity;
use crate::config::MIN_SECRET_LEN;
use crate::error::AppError;
use crate::models::Session;
use crate::store::{SessionStore, UserStore};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "taskshare_sid";

/// Absolute lifetime of a session, counted from login.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Token byte length before hex encoding (32 bytes = 64 hex chars).
const TOKEN_BYTES: usize = 32;

/// What a request's cookie resolved to.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    /// The verified token, present whenever the cookie carried a valid signature,
    /// even if the session behind it is gone.
    pub token: Option<String>,
    /// Set only for a live session whose user still exists.
    pub identity: Option<Identity>,
}

impl CurrentSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    key: Key,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        secret: &[u8],
        secure_cookie: bool,
    ) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::InternalServerError(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            store,
            users,
            key: Key::derive_from(secret),
            ttl: Duration::hours(SESSION_TTL_HOURS),
            secure_cookie,
        })
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Starts a session for `user_id` and returns the cookie to send back.
    pub async fn establish(&self, user_id: Uuid) -> Result<Cookie<'static>, AppError> {
        let token = generate_token();
        let created_at = Utc::now();
        self.store
            .insert(Session {
                token_hash: hash_token(&token),
                user_id,
                created_at,
                expires_at: created_at + self.ttl,
            })
            .await?;
        self.signed_cookie(token)
    }

    /// Resolves the request's session cookie, if any, to an identity.
    ///
    /// Missing, forged, unknown and expired tokens all resolve to anonymous; only
    /// store failures are errors.
    pub async fn resolve(
        &self,
        cookie: Option<Cookie<'static>>,
    ) -> Result<CurrentSession, AppError> {
        let token = match cookie.and_then(|cookie| self.verify(cookie)) {
            Some(token) => token,
            None => return Ok(CurrentSession::anonymous()),
        };
        let token_hash = hash_token(&token);
        let unauthenticated = CurrentSession {
            token: Some(token),
            identity: None,
        };

        let session = match self.store.find(&token_hash).await? {
            Some(session) => session,
            None => return Ok(unauthenticated),
        };
        if session.is_expired_at(Utc::now()) {
            log::debug!("session for user {} expired", session.user_id);
            self.store.remove(&token_hash).await?;
            return Ok(unauthenticated);
        }

        let identity = self
            .users
            .find_by_id(session.user_id)
            .await?
            .map(|user| Identity {
                id: user.id,
                email: user.email,
            });
        Ok(CurrentSession {
            identity,
            ..unauthenticated
        })
    }

    /// Ends the session behind `token`. Unknown tokens are ignored.
    pub async fn destroy(&self, token: &str) -> Result<(), AppError> {
        self.store.remove(&hash_token(token)).await
    }

    /// A cookie that makes the browser drop the session cookie.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .finish()
    }

    fn signed_cookie(&self, token: String) -> Result<Cookie<'static>, AppError> {
        let mut cookie = self.base_cookie(token);
        cookie.set_max_age(CookieDuration::seconds(self.ttl.num_seconds()));

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(SESSION_COOKIE)
            .cloned()
            .ok_or_else(|| AppError::InternalServerError("failed to sign session cookie".into()))
    }

    /// Returns the token if the cookie's signature checks out.
    fn verify(&self, cookie: Cookie<'static>) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        jar.signed(&self.key)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Tokens are high-entropy, so a single SHA-256 pass is enough.
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
