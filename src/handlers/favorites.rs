// Favorites handlers; a caller only ever sees and edits their own

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::AuthenticatedUser,
    models::{favorite::Favorite, service::Service},
    utils::{ApiError, PathParam},
};

/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<Vec<Service>>, ApiError> {
    let user_id = user.user_id();
    let services = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Favorite::list_services(conn, user_id).await?) })
        })
        .await?;

    Ok(ApiResponse::ok(services, "Favorites retrieved"))
}

/// POST /favorites/{service_id}; adding twice is a no-op
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(service_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    let user_id = user.user_id();
    let added = state
        .with_connection(move |conn| {
            Box::pin(async move {
                use diesel::result::{DatabaseErrorKind, Error};

                match Favorite::add(conn, user_id, service_id).await {
                    Ok(added) => Ok(added),
                    Err(Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                        Err(ApiError::NotFound("Service"))
                    },
                    Err(e) => Err(e.into()),
                }
            })
        })
        .await?;

    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok(ApiResponse::ok(service_id, "Service added to favorites").with_status(status))
}

/// DELETE /favorites/{service_id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(service_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    let user_id = user.user_id();
    let removed = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Favorite::remove(conn, user_id, service_id).await?) })
        })
        .await?;

    if !removed {
        return Err(ApiError::NotFound("Favorite"));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
