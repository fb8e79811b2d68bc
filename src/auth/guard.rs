use super::{CurrentSession, Identity};
use crate::error::AppError;

/// Every task operation goes through here: no identity, no access.
pub fn require_authenticated(session: CurrentSession) -> Result<Identity, AppError> {
    session
        .identity
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))
}
