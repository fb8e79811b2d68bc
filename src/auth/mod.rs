//! Authentication, sessions and the authorization guard.
//!
//! Request flow: the `CurrentSession` extractor resolves the session cookie through
//! the `SessionManager`, and `Authenticated` runs it through the guard, handing the
//! handler an explicit `Identity` value.

pub mod authenticator;
pub mod extractors;
pub mod guard;
pub mod password;
pub mod session;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use authenticator::Authenticator;
pub use extractors::Authenticated;
pub use guard::require_authenticated;
pub use password::{hash_password, verify_password};
pub use session::{CurrentSession, SessionManager, SESSION_COOKIE, SESSION_TTL_HOURS};

/// The user a request acts as. Also the public shape of a user in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}
