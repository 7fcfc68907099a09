// Quote ("devis") handlers

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
    middleware::{require_admin, require_staff, AuthenticatedUser},
    models::quote::{CreateQuoteRequest, Quote, UpdateQuoteRequest},
    utils::{ApiError, JsonBody, PathParam},
};

fn not_found_as_quote(e: diesel::result::Error) -> ApiError {
    use diesel::result::{DatabaseErrorKind, Error};

    match e {
        Error::NotFound => ApiError::NotFound("Quote"),
        Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ApiError::NotFound("Service")
        },
        other => other.into(),
    }
}

/// POST /create/devis
pub async fn create_quote(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(req): JsonBody<CreateQuoteRequest>,
) -> Result<Response, ApiError> {
    req.validate()?;

    let user_id = user.user_id();
    let quote = state
        .with_connection(move |conn| {
            Box::pin(async move { Quote::create(conn, user_id, req).await.map_err(not_found_as_quote) })
        })
        .await?;

    tracing::info!(quote_id = %quote.id, service_id = %quote.service_id, "Quote requested");
    Ok(ApiResponse::ok(quote, "Quote requested").with_status(StatusCode::CREATED))
}

/// GET /devis: own quotes, or all of them for staff
pub async fn list_quotes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<Vec<Quote>>, ApiError> {
    let owner = if user.is_staff() { None } else { Some(user.user_id()) };

    let quotes = state
        .with_connection(move |conn| Box::pin(async move { Ok(Quote::list(conn, owner).await?) }))
        .await?;

    Ok(ApiResponse::ok(quotes, "Quotes retrieved"))
}

/// PUT /update/devis/{id} (admin or employee)
pub async fn update_quote(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(quote_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<UpdateQuoteRequest>,
) -> Result<ApiResponse<Quote>, ApiError> {
    require_staff(&user)?;
    req.validate()?;
    if req.is_empty() {
        return Err(ApiError::ValidationError("status or amount_cents is required".to_string()));
    }

    let quote = state
        .with_connection(move |conn| {
            Box::pin(async move { Quote::update(conn, quote_id, req).await.map_err(not_found_as_quote) })
        })
        .await?;

    tracing::info!(quote_id = %quote.id, status = %quote.status, actor = %user.user_id(), "Quote updated");
    Ok(ApiResponse::ok(quote, "Quote updated"))
}

/// DELETE /delete/devis/{id} (admin)
pub async fn delete_quote(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(quote_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;

    let deleted = state
        .with_connection(move |conn| Box::pin(async move { Ok(Quote::delete(conn, quote_id).await?) }))
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Quote"));
    }

    tracing::info!(quote_id = %quote_id, actor = %user.user_id(), "Quote deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
