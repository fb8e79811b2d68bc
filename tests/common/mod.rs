#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    middleware::Logger,
    test, web, App, Error,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use taskshare::{
    auth::SESSION_COOKIE,
    error::AppError,
    models::Session,
    routes,
    store::{MemorySessionStore, MemoryTaskStore, MemoryUserStore, SessionStore},
    AppState,
};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ORIGIN: &str = "http://localhost:3000";

/// bcrypt's minimum work factor keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn state() -> web::Data<AppState> {
    web::Data::new(
        AppState::in_memory(SECRET.as_bytes(), TEST_BCRYPT_COST)
            .expect("in-memory state should build"),
    )
}

/// A session store that is never ready on first poll, like a networked backend.
#[derive(Default)]
pub struct YieldingSessionStore {
    inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for YieldingSessionStore {
    async fn insert(&self, session: Session) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.insert(session).await
    }

    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        tokio::task::yield_now().await;
        self.inner.find(token_hash).await
    }

    async fn remove(&self, token_hash: &str) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.remove(token_hash).await
    }
}

pub fn yielding_state() -> web::Data<AppState> {
    web::Data::new(
        AppState::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            Arc::new(YieldingSessionStore::default()),
            SECRET.as_bytes(),
            TEST_BCRYPT_COST,
            false,
        )
        .expect("yielding state should build"),
    )
}

pub async fn init_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    init_app_with(state()).await
}

pub async fn init_app_with(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(routes::cors(ORIGIN))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

pub async fn register<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// Registers and logs in, returning the session cookie.
pub async fn sign_up<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = register(app, email, "password123").await;
    assert_eq!(resp.status(), 201, "register {}", email);
    let resp = login(app, email, "password123").await;
    assert_eq!(resp.status(), 200, "login {}", email);
    session_cookie(&resp).expect("login should set a session cookie")
}

/// Creates a task as the cookie's owner and returns its JSON.
pub async fn create_task<S, B>(app: &S, cookie: &Cookie<'static>, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    test::read_body_json(resp).await
}

pub async fn list_titles<S, B>(app: &S, cookie: &Cookie<'static>) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    let tasks: Vec<Value> = test::read_body_json(resp).await;
    let mut titles: Vec<String> = tasks
        .iter()
        .map(|task| task["title"].as_str().unwrap_or_default().to_string())
        .collect();
    titles.sort();
    titles
}
