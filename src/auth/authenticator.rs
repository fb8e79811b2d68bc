use std::sync::Arc;
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::Identity;
use crate::error::AppError;
use crate::models::NewUser;
use crate::store::UserStore;

/// Verifies credentials against the credential store and creates new accounts.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, hash_cost: u32) -> Self {
        Self { users, hash_cost }
    }

    /// Creates a user. The plaintext password is hashed off the async executor and
    /// then dropped.
    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            log::info!("registration rejected: email already in use");
            return Err(AppError::DuplicateEmail);
        }

        let password = password.to_owned();
        let cost = self.hash_cost;
        let password_hash = run_blocking(move || hash_password(&password, cost)).await?;

        // The store re-checks uniqueness, so a concurrent registration still loses cleanly.
        let user = self
            .users
            .insert(NewUser {
                email: email.to_owned(),
                password_hash,
            })
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user.id)
    }

    /// Unknown email and wrong password fail identically with `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                log::warn!("login failed: no user with email {}", email);
                return Err(AppError::InvalidCredentials);
            }
        };

        let password = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let matches = run_blocking(move || verify_password(&password, &stored_hash)).await?;
        if !matches {
            log::warn!("login failed: wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        log::info!("user {} logged in", user.id);
        Ok(Identity {
            id: user.id,
            email: user.email,
        })
    }
}

async fn run_blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("password task failed: {}", e)))?
}
