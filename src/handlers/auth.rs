// Authentication handlers: signup, login, token verification, profile

use axum::{extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::AuthenticatedUser,
    models::{
        auth::TokenSubject,
        user::{normalize_email, NewUser, User},
    },
    utils::{
        hash_password_async, needs_rehash, required_field, verify_password_async, ApiError,
        JsonBody,
    },
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Signup body. Fields are optional here so a missing one is a 400 with a
/// readable message rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    #[serde(alias = "motdepasse", alias = "password")]
    pub secret: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub codepostal: Option<String>,
    pub ville: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    #[serde(alias = "motdepasse", alias = "password")]
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: User,
}

/// Claim subset returned by `/verify-token`
#[derive(Debug, Serialize)]
pub struct VerifiedIdentity {
    pub id: uuid::Uuid,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(rename = "isEmployee")]
    pub is_employee: bool,
    pub exp: u64,
}

fn token_response(state: &AppState, user: User) -> Result<TokenResponse, ApiError> {
    let token = state.jwt_service.issue(TokenSubject::from(&user))?;
    Ok(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt_service.token_expiry(),
        user,
    })
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<Response, ApiError> {
    // Validate everything before touching the store
    let email = normalize_email(&required_field("email", req.email.as_ref())?);
    let secret = required_field("secret", req.secret.as_ref())?;
    let last_name = required_field("nom", req.nom.as_ref())?;
    let first_name = required_field("prenom", req.prenom.as_ref())?;
    let postal_code = required_field("codepostal", req.codepostal.as_ref())?;
    let city = required_field("ville", req.ville.as_ref())?;

    if !validator::validate_email(email.as_str()) {
        return Err(ApiError::ValidationError("email: Invalid email format".to_string()));
    }

    // Hash outside the connection scope so a slow hash does not hold a connection
    let password_hash = hash_password_async(secret, state.password_config.clone()).await?;

    let new_user = NewUser {
        email,
        password_hash,
        last_name,
        first_name,
        postal_code,
        city,
    };

    let user = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(User::create(conn, new_user).await?) })
        })
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    let data = token_response(&state, user)?;
    Ok(ApiResponse::ok(data, "Account created").with_status(StatusCode::CREATED))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = required_field("email", req.email.as_ref())?;
    let secret = required_field("secret", req.secret.as_ref())?;

    let user = state
        .with_connection(move |conn| {
            Box::pin(async move { Ok(User::find_by_email(conn, &email).await?) })
        })
        .await?;

    if !verify_password_async(secret.clone(), user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "Login failed: wrong secret");
        return Err(ApiError::InvalidLogin);
    }

    // Upgrade legacy or outdated hashes now that the clear secret is at hand.
    // Failure here is logged and does not block the login.
    if needs_rehash(&user.password_hash, &state.password_config).unwrap_or(false) {
        match hash_password_async(secret, state.password_config.clone()).await {
            Ok(new_hash) => {
                let email = user.email.clone();
                let upgraded = state
                    .with_connection(move |conn| {
                        Box::pin(async move {
                            Ok(User::update_password_by_email(conn, &email, &new_hash).await?)
                        })
                    })
                    .await;
                match upgraded {
                    Ok(()) => tracing::info!(user_id = %user.id, "Password hash upgraded"),
                    Err(e) => tracing::warn!(user_id = %user.id, "Password hash upgrade failed: {}", e),
                }
            },
            Err(e) => tracing::warn!(user_id = %user.id, "Password rehash failed: {}", e),
        }
    }

    tracing::info!(user_id = %user.id, "Login successful");

    let data = token_response(&state, user)?;
    Ok(ApiResponse::ok(data, "Login successful").with_status(StatusCode::OK))
}

/// POST /verify-token
pub async fn verify_token(user: AuthenticatedUser) -> ApiResponse<VerifiedIdentity> {
    let claims = user.claims();
    ApiResponse::ok(
        VerifiedIdentity {
            id: claims.id,
            email: claims.email.clone(),
            nom: claims.last_name.clone(),
            prenom: claims.first_name.clone(),
            is_admin: claims.is_admin,
            is_employee: claims.is_employee,
            exp: claims.exp,
        },
        "Token is valid",
    )
}

/// GET /me
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<User>, ApiError> {
    let user_id = user.user_id();
    let profile = state
        .with_connection(move |conn| {
            // 404 when the token outlived its account
            Box::pin(async move { Ok(User::find_by_id(conn, user_id).await?) })
        })
        .await?;

    Ok(ApiResponse::ok(profile, "Profile retrieved"))
}
