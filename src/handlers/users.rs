// Account management handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::{require_admin, AuthenticatedUser},
    models::user::{RoleUpdate, User, UserUpdate},
    utils::{
        hash_password_async, required_field, trim_optional_field, ApiError, JsonBody,
        PathParam,
    },
};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub codepostal: Option<String>,
    pub ville: Option<String>,
    #[serde(alias = "motdepasse", alias = "password")]
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(alias = "motdepasse", alias = "password")]
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRolesRequest {
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
    #[serde(rename = "isEmployee")]
    pub is_employee: Option<bool>,
}

/// PUT /update/user/{id} (self or admin)
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(user_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    if user.user_id() != user_id {
        require_admin(&user)?;
    }

    let password_hash = match trim_optional_field(req.secret.as_ref()) {
        Some(secret) => Some(hash_password_async(secret, state.password_config.clone()).await?),
        None => None,
    };

    let update = UserUpdate {
        password_hash,
        last_name: trim_optional_field(req.nom.as_ref()),
        first_name: trim_optional_field(req.prenom.as_ref()),
        postal_code: trim_optional_field(req.codepostal.as_ref()),
        city: trim_optional_field(req.ville.as_ref()),
        updated_at: None,
    };

    if update.password_hash.is_none()
        && update.last_name.is_none()
        && update.first_name.is_none()
        && update.postal_code.is_none()
        && update.city.is_none()
    {
        return Err(ApiError::ValidationError("No fields to update".to_string()));
    }

    let updated = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(User::update(conn, user_id, update).await?) })
        })
        .await?;

    tracing::info!(user_id = %updated.id, actor = %user.user_id(), "Account updated");
    Ok(ApiResponse::ok(updated, "Account updated"))
}

/// PUT /update/password, keyed by the email in the caller's token
pub async fn update_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(req): JsonBody<UpdatePasswordRequest>,
) -> Result<Response, ApiError> {
    let secret = required_field("secret", req.secret.as_ref())?;
    let new_hash = hash_password_async(secret, state.password_config.clone()).await?;
    let email = user.email().to_string();

    state
        .with_connection(move |conn| {
            Box::pin(async move {
                Ok(User::update_password_by_email(conn, &email, &new_hash).await?)
            })
        })
        .await?;

    tracing::info!(user_id = %user.user_id(), "Password updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// DELETE /delete/user/{id} (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(user_id): PathParam<Uuid>,
) -> Result<Response, ApiError> {
    require_admin(&user)?;

    state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(User::delete(conn, user_id).await?) })
        })
        .await?;

    tracing::info!(user_id = %user_id, actor = %user.user_id(), "Account deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// PUT /admin/users/{id}/roles (admin)
pub async fn set_roles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(user_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<SetRolesRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    require_admin(&user)?;

    if req.is_admin.is_none() && req.is_employee.is_none() {
        return Err(ApiError::ValidationError(
            "isAdmin or isEmployee is required".to_string(),
        ));
    }

    let roles = RoleUpdate {
        is_admin: req.is_admin,
        is_employee: req.is_employee,
        updated_at: chrono::Utc::now(),
    };

    let updated = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(User::set_roles(conn, user_id, roles).await?) })
        })
        .await?;

    tracing::info!(
        user_id = %updated.id,
        actor = %user.user_id(),
        is_admin = updated.is_admin,
        is_employee = updated.is_employee,
        "Roles updated"
    );
    Ok(ApiResponse::ok(updated, "Roles updated"))
}
