use crate::{
    access::{authorize_read, authorize_write, not_found},
    auth::Authenticated,
    error::AppError,
    models::{Task, TaskInput, TaskPatch},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, Error as ActixError, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

// Path and body extraction run alongside session resolution, so their errors are
// taken as values and only surfaced once `Authenticated` has succeeded. A caller
// without a session always gets 401, whatever else is wrong with the request.
type TaskId = Result<web::Path<Uuid>, ActixError>;
type JsonBody<T> = Result<web::Json<T>, ActixError>;

/// Lists the tasks visible to the authenticated user.
///
/// The store selects owned and shared tasks in one query, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: no valid session.
/// - `500 Internal Server Error`: storage failure.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_visible(identity.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `isShared` (optional): defaults to `false`.
///
/// Any owner field in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `401 Unauthorized`: no valid session.
/// - `422 Unprocessable Entity`: validation failed.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    Authenticated(identity): Authenticated,
    task_data: JsonBody<TaskInput>,
) -> Result<HttpResponse, ActixError> {
    let task_data = task_data?;
    task_data.validate().map_err(AppError::from)?;

    let task = Task::new(task_data.into_inner(), identity.id);
    let created = state.tasks.insert(task).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Retrieves a task the user may read: their own, or any shared task.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task exists but is private to someone else.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    Authenticated(identity): Authenticated,
    task_id: TaskId,
) -> Result<HttpResponse, ActixError> {
    let task = state.tasks.find(task_id?.into_inner()).await?;
    let task = authorize_read(task, &identity)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to a task owned by the user.
///
/// Only keys present in the body change. `description: null` clears the
/// description; `title` and `isShared` cannot be null.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: an invalid field value.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    Authenticated(identity): Authenticated,
    task_id: TaskId,
    patch: JsonBody<TaskPatch>,
) -> Result<HttpResponse, ActixError> {
    let task_id = task_id?.into_inner();
    let patch = patch?;
    let existing = state.tasks.find(task_id).await?;
    let mut task = authorize_write(existing, &identity)?;

    patch.into_inner().apply(&mut task)?;

    let updated = state.tasks.update(task).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task owned by the user.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no task with that id, including one already deleted.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    Authenticated(identity): Authenticated,
    task_id: TaskId,
) -> Result<HttpResponse, ActixError> {
    let existing = state.tasks.find(task_id?.into_inner()).await?;
    let task = authorize_write(existing, &identity)?;

    if !state.tasks.delete(task.id).await? {
        return Err(not_found().into());
    }
    log::info!("user {} deleted task {}", identity.id, task.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
