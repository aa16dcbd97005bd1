/// Per-user statistics endpoints
///
/// - `GET /api/user/stats` - Totals and completion rate
/// - `GET /api/user/tasks` - Newest-first task lists
/// - `GET /api/user/category-stats` - Counts per known category

use crate::{app::AppState, error::ApiResult, session::CurrentUser};
use axum::{extract::State, Extension, Json};
use quadrant_shared::{
    models::category::CategoryCounts,
    service::tasks::{TaskStats, TasksView},
};

/// ```json
/// { "total_tasks": 3, "completed_tasks": 1, "pending_tasks": 2, "completion_rate": 33.3 }
/// ```
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<TaskStats>> {
    Ok(Json(state.tasks.stats(user.id).await?))
}

pub async fn tasks_view(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<TasksView>> {
    Ok(Json(state.tasks.tasks_view(user.id).await?))
}

/// Always the six known categories; unknown ones are not counted
pub async fn category_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<CategoryCounts>> {
    Ok(Json(state.tasks.category_stats(user.id).await?))
}
