/// Task endpoints
///
/// Every handler runs behind the session middleware and only ever touches
/// tasks owned by the logged-in user. Someone else's task id gets the same
/// 404 as an id that does not exist.
///
/// # Endpoints
///
/// - `GET /api/tasks` - All of the caller's tasks
/// - `POST /api/tasks` - Create a task (201)
/// - `PUT /api/tasks/:id` - Partial update
/// - `POST /api/tasks/:id/complete` - Mark completed
/// - `DELETE /api/tasks/:id` - Delete permanently

use crate::{
    app::AppState,
    error::ApiResult,
    routes::auth::SuccessResponse,
    session::CurrentUser,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use quadrant_shared::{
    models::task::{Task, TaskChanges},
    service::tasks::TaskDraft,
};
use serde::Deserialize;
use validator::Validate;

/// Create task body
///
/// `title`, `importance`, and `urgency` are required; their absence is
/// reported by the service as a 400.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(max = 120, message = "Title must be at most 120 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 20, message = "Category must be at most 20 characters"))]
    pub category: Option<String>,

    pub importance: Option<i32>,

    pub urgency: Option<i32>,
}

impl From<CreateTaskRequest> for TaskDraft {
    fn from(req: CreateTaskRequest) -> Self {
        TaskDraft {
            title: req.title,
            description: req.description,
            category: req.category,
            importance: req.importance,
            urgency: req.urgency,
        }
    }
}

/// Update task body; absent and `null` fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1 to 120 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 20, message = "Category must be at most 20 characters"))]
    pub category: Option<String>,

    pub importance: Option<i32>,

    pub urgency: Option<i32>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            description: req.description,
            category: req.category,
            importance: req.importance,
            urgency: req.urgency,
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list(user.id).await?))
}

/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// { "title": "Write report", "category": "work", "importance": 5, "urgency": 3 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing title/importance/urgency or malformed body
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state.tasks.create(user.id, req.into()).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// # Errors
///
/// - `400 Bad Request`: Empty title or malformed body
/// - `404 Not Found`: No such task for this user, or an id that is not an integer
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = task_id?;
    let Json(req) = payload?;
    req.validate()?;

    let task = state.tasks.update(user.id, task_id, req.into()).await?;

    Ok(Json(task))
}

pub async fn complete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(task_id) = task_id?;
    state.tasks.complete(user.id, task_id).await?;
    Ok(SuccessResponse::ok())
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    task_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(task_id) = task_id?;
    state.tasks.delete(user.id, task_id).await?;
    Ok(SuccessResponse::ok())
}
