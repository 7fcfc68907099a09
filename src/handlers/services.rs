// Services catalogue handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::{require_admin, AuthenticatedUser},
    models::service::{
        CreateServiceRequest, ListServicesParams, NewService, Service, ServiceUpdate,
        UpdateServiceRequest,
    },
    utils::{ApiError, JsonBody, PathParam},
};

/// GET /services?sort=&order=
pub async fn list_services(
    State(state): State<AppState>,
    Query(params): Query<ListServicesParams>,
) -> Result<ApiResponse<Vec<Service>>, ApiError> {
    let (sort, order) = params.parse().map_err(ApiError::ValidationError)?;

    let services = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Service::list(conn, sort, order).await?) })
        })
        .await?;

    Ok(ApiResponse::ok(services, "Services retrieved"))
}

/// GET /service/{id}
pub async fn get_service(
    State(state): State<AppState>,
    PathParam(service_id): PathParam<Uuid>,
) -> Result<ApiResponse<Service>, ApiError> {
    let service = state
        .with_connection(move |conn| {
            Box::pin(async move {
                Service::find_by_id(conn, service_id)
                    .await
                    .map_err(not_found_as_service)
            })
        })
        .await?;

    Ok(ApiResponse::ok(service, "Service retrieved"))
}

/// POST /create/service (admin)
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(req): JsonBody<CreateServiceRequest>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;
    req.validate()?;

    let new_service = NewService::from(req);
    let service = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Service::create(conn, new_service).await?) })
        })
        .await?;

    tracing::info!(service_id = %service.id, actor = %user.user_id(), "Service created");
    Ok(ApiResponse::ok(service, "Service created").with_status(StatusCode::CREATED))
}

/// PUT /update/service/{id} (admin)
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(service_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<UpdateServiceRequest>,
) -> Result<ApiResponse<Service>, ApiError> {
    require_admin(&user)?;
    req.validate()?;

    let update = ServiceUpdate::from(req);
    let service = state
        .with_connection(move |conn| {
            Box::pin(async move {
                Service::update(conn, service_id, update)
                    .await
                    .map_err(not_found_as_service)
            })
        })
        .await?;

    tracing::info!(service_id = %service.id, actor = %user.user_id(), "Service updated");
    Ok(ApiResponse::ok(service, "Service updated"))
}

/// DELETE /delete/service/{id} (admin)
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(service_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;

    let deleted = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(Service::delete(conn, service_id).await?) })
        })
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Service"));
    }

    tracing::info!(service_id = %service_id, actor = %user.user_id(), "Service deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn not_found_as_service(e: diesel::result::Error) -> ApiError {
    match e {
        diesel::result::Error::NotFound => ApiError::NotFound("Service"),
        other => other.into(),
    }
}
