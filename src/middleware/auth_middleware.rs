// Authentication gate for protected routes
// Verifies the bearer token and injects AuthenticatedUser into request extensions

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{app::AppState, middleware::auth::AuthenticatedUser, utils::ApiError};

/// Rejects with 403 when no bearer token is present and 401 when the token
/// does not verify. The wrapped handler only runs for verified requests.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        tracing::warn!(kind = "missing", path = %request.uri().path(), "Authentication failed");
        return ApiError::MissingCredential.into_response();
    };

    match app_state.jwt_service.verify(bearer.token()) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from_verified(claims));
            next.run(request).await
        },
        Err(e) => {
            tracing::warn!(kind = e.kind(), path = %request.uri().path(), "Authentication failed");
            ApiError::from(e).into_response()
        },
    }
}

/// Extractor for AuthenticatedUser from request extensions.
/// A route without the gate has no identity, which reads as a missing credential.
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::MissingCredential)
    }
}
