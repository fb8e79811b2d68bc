//! Task access control.
//!
//! Reads are allowed to the owner and, for shared tasks, to any authenticated user.
//! Writes are owner-only. Existence is always checked before ownership, so a
//! missing id is a 404 for everyone and never leaks as a 403.

use crate::auth::Identity;
use crate::error::AppError;
use crate::models::Task;

pub fn can_read(task: &Task, requester: &Identity) -> bool {
    task.user_id == requester.id || task.is_shared
}

pub fn can_write(task: &Task, requester: &Identity) -> bool {
    task.user_id == requester.id
}

pub fn authorize_read(task: Option<Task>, requester: &Identity) -> Result<Task, AppError> {
    let task = task.ok_or_else(not_found)?;
    if !can_read(&task, requester) {
        return Err(AppError::Forbidden("Forbidden".into()));
    }
    Ok(task)
}

pub fn authorize_write(task: Option<Task>, requester: &Identity) -> Result<Task, AppError> {
    let task = task.ok_or_else(not_found)?;
    if !can_write(&task, requester) {
        log::warn!(
            "user {} denied write on task {} owned by {}",
            requester.id,
            task.id,
            task.user_id
        );
        return Err(AppError::Forbidden("Forbidden".into()));
    }
    Ok(task)
}

pub fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
