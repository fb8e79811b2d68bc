use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::CurrentSession,
    error::AppError,
    models::{LoginRequest, RegisterRequest},
    state::AppState,
};

/// Register a new user
///
/// Creates the account only; the caller still has to log in.
///
/// ## Responses:
/// - `201 Created`: `{"message": ...}`.
/// - `400 Bad Request`: the email is already registered.
/// - `422 Unprocessable Entity`: malformed email or a password under 6 characters.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    state
        .authenticator
        .register(&register_data.email, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Log in
///
/// Verifies the credentials and starts a session, returned as an HTTP-only cookie.
/// A session the caller was already holding is ended first.
///
/// ## Responses:
/// - `200 OK`: `{"message": ..., "user": {"id", "email"}}` plus `Set-Cookie`.
/// - `401 Unauthorized`: unknown email or wrong password, with the same message.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    session: CurrentSession,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let identity = state
        .authenticator
        .login(&login_data.email, &login_data.password)
        .await?;

    if let Some(previous) = session.token.as_deref() {
        state.sessions.destroy(previous).await?;
    }
    let cookie = state.sessions.establish(identity.id).await?;

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Logged in successfully",
        "user": identity
    })))
}

/// Log out
///
/// Ends the session behind the cookie, if any, and tells the browser to drop it.
/// Calling it without a session is not an error.
#[get("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    session: CurrentSession,
) -> Result<impl Responder, AppError> {
    if let Some(token) = session.token.as_deref() {
        state.sessions.destroy(token).await?;
    }
    if let Some(identity) = &session.identity {
        log::info!("user {} logged out", identity.id);
    }

    Ok(HttpResponse::Ok()
        .cookie(state.sessions.removal_cookie())
        .json(json!({
            "message": "Logged out successfully"
        })))
}

/// Current user
///
/// `200 {"user": {...}}` for a live session, `401 {"user": null}` otherwise.
#[get("/current-user")]
pub async fn current_user(session: CurrentSession) -> impl Responder {
    match session.identity {
        Some(identity) => HttpResponse::Ok().json(json!({ "user": identity })),
        None => HttpResponse::Unauthorized().json(json!({ "user": null })),
    }
}
