//! In-process stores backed by `parking_lot` locks.
//!
//! Sessions use these by default. Tests use all three so the HTTP layer can be
//! exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{SessionStore, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Session, Task, User};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write();
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User::new(user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let mut visible: Vec<Task> = self
            .tasks
            .read()
            .values()
            .filter(|task| task.user_id == user_id || task.is_shared)
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().insert(task.id, task.clone());
        Ok(task)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().get(&id).cloned())
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                stored.title = task.title;
                stored.description = task.description;
                stored.is_shared = task.is_shared;
                stored.updated_at = task.updated_at;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    /// Expired sessions that were never presented again are dropped here.
    async fn insert(&self, session: Session) -> Result<(), AppError> {
        let mut sessions = self.sessions.write();
        let now = Utc::now();
        sessions.retain(|_, existing| !existing.is_expired_at(now));
        sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.read().get(token_hash).cloned())
    }

    async fn remove(&self, token_hash: &str) -> Result<(), AppError> {
        self.sessions.write().remove(token_hash);
        Ok(())
    }
}
