use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use super::guard::require_authenticated;
use super::session::{CurrentSession, SESSION_COOKIE};
use super::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the request's session cookie through the `SessionManager` in `AppState`.
///
/// Never fails for anonymous requests; only a store failure or missing app state
/// turns into an error response.
impl FromRequest for CurrentSession {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let cookie = req.cookie(SESSION_COOKIE);
        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::InternalServerError("AppState is not registered".to_string())
            })?;
            Ok(state.sessions.resolve(cookie).await?)
        })
    }
}

/// The identity of an authenticated caller. Extraction fails with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl FromRequest for Authenticated {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = CurrentSession::from_request(req, payload);
        Box::pin(async move {
            let identity = require_authenticated(session.await?)?;
            Ok(Authenticated(identity))
        })
    }
}
