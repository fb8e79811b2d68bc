use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{Authenticator, SessionManager};
use crate::config::{Config, SessionBackend};
use crate::error::AppError;
use crate::store::{
    MemorySessionStore, MemoryTaskStore, MemoryUserStore, PgSessionStore, PgTaskStore,
    PgUserStore, SessionStore, TaskStore, UserStore,
};

/// Everything a request handler needs, constructed once at startup and shared
/// through `web::Data`.
pub struct AppState {
    pub authenticator: Authenticator,
    pub sessions: SessionManager,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        session_store: Arc<dyn SessionStore>,
        session_secret: &[u8],
        bcrypt_cost: u32,
        secure_cookie: bool,
    ) -> Result<Self, AppError> {
        let sessions =
            SessionManager::new(session_store, users.clone(), session_secret, secure_cookie)?;
        Ok(Self {
            authenticator: Authenticator::new(users, bcrypt_cost),
            sessions,
            tasks,
        })
    }

    /// Production wiring: users and tasks in PostgreSQL, sessions per `SESSION_BACKEND`.
    pub fn from_config(config: &Config, pool: PgPool) -> Result<Self, AppError> {
        let session_store: Arc<dyn SessionStore> = match config.session_backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
            SessionBackend::Postgres => Arc::new(PgSessionStore::new(pool.clone())),
        };
        Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTaskStore::new(pool)),
            session_store,
            config.session_secret.as_bytes(),
            config.bcrypt_cost,
            config.cookie_secure,
        )
    }

    /// Fully in-process state, nothing survives a restart.
    pub fn in_memory(session_secret: &[u8], bcrypt_cost: u32) -> Result<Self, AppError> {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            Arc::new(MemorySessionStore::new()),
            session_secret,
            bcrypt_cost,
            false,
        )
    }
}
