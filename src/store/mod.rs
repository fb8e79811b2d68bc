//! Persistence seams for users, tasks and sessions.
//!
//! Handlers never talk to a database directly; they receive these traits through
//! `AppState`. Each store serializes its own writes (a single SQL statement, or a
//! lock held for the duration of one operation), so no request-level locking exists.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Session, Task, User};

pub use memory::{MemorySessionStore, MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgSessionStore, PgTaskStore, PgUserStore};

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with `AppError::DuplicateEmail` if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `user_id` together with every shared task, newest first.
    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Task>, AppError>;

    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Overwrites the mutable fields of an existing task. `None` if it no longer exists.
    async fn update(&self, task: Task) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), AppError>;

    /// Looks up a session by token digest. Expiry is not checked here.
    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    async fn remove(&self, token_hash: &str) -> Result<(), AppError>;
}
