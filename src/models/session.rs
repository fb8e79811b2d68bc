use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A server-side session record.
///
/// Keyed by the SHA-256 digest of the session token; the token itself is only
/// ever held by the client.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
