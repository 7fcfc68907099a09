// Task assignment handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::{require_admin, AuthenticatedUser},
    models::task::{CreateTaskRequest, Task, UpdateTaskStatusRequest},
    utils::{ApiError, JsonBody, PathParam},
};

/// POST /create/task (admin)
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;
    req.validate()?;

    let created_by = user.user_id();
    let task = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Task::create(conn, created_by, req).await?) })
        })
        .await?;

    tracing::info!(task_id = %task.id, assignee = %task.assignee_id, "Task created");
    Ok(ApiResponse::ok(task, "Task created").with_status(StatusCode::CREATED))
}

/// GET /tasks: admins see every task, everyone else their own
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<Vec<Task>>, ApiError> {
    let assignee = if user.is_admin() { None } else { Some(user.user_id()) };

    let tasks = state
        .with_connection(move |conn| Box::pin(async move { Ok(Task::list(conn, assignee).await?) }))
        .await?;

    Ok(ApiResponse::ok(tasks, "Tasks retrieved"))
}

/// PUT /update/task/{id}/status (assignee or admin)
pub async fn update_task_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(task_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<UpdateTaskStatusRequest>,
) -> Result<ApiResponse<Task>, ApiError> {
    let acting_user = user.user_id();
    let is_admin = user.is_admin();

    let task = state
        .with_connection(move |conn| {
            Box::pin(async move {
                Ok(Task::update_status(conn, task_id, acting_user, is_admin, req.status).await?)
            })
        })
        .await?;

    tracing::info!(task_id = %task.id, status = %task.status, actor = %acting_user, "Task status updated");
    Ok(ApiResponse::ok(task, "Task updated"))
}

/// DELETE /delete/task/{id} (admin)
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(task_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;

    state
        .with_connection(move |conn| Box::pin(async move { Ok(Task::delete(conn, task_id).await?) }))
        .await?;

    tracing::info!(task_id = %task_id, actor = %user.user_id(), "Task deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
