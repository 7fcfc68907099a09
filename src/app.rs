// Application state and router assembly
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use diesel_async::AsyncPgConnection;
use futures_util::future::BoxFuture;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    app_config::AppConfig,
    db::{with_connection, DieselPool},
    handlers,
    middleware::auth_middleware,
    services::JwtService,
    utils::{ApiError, PasswordConfig},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub jwt_service: Arc<JwtService>,
    pub password_config: PasswordConfig,
}

impl AppState {
    pub fn new(config: AppConfig, diesel_pool: DieselPool) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            crate::services::JwtConfig::from_app_config(&config.jwt),
        ));
        let password_config = PasswordConfig::from(&config.security);

        Self {
            config: Arc::new(config),
            diesel_pool,
            jwt_service,
            password_config,
        }
    }

    /// Run `op` on one pooled connection; see [`with_connection`]
    pub async fn with_connection<F, T>(&self, op: F) -> Result<T, ApiError>
    where
        F: for<'c> FnOnce(&'c mut AsyncPgConnection) -> BoxFuture<'c, Result<T, ApiError>>
            + Send
            + 'static,
        T: Send + 'static,
    {
        with_connection(&self.diesel_pool, op).await
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Routes that run without a token
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/services", get(handlers::services::list_services))
        .route("/service/{id}", get(handlers::services::get_service))
}

/// Routes behind the auth gate
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/verify-token", post(handlers::auth::verify_token))
        .route("/me", get(handlers::auth::me))
        .route("/update/user/{id}", put(handlers::users::update_user))
        .route("/update/password", put(handlers::users::update_password))
        .route("/delete/user/{id}", delete(handlers::users::delete_user))
        .route("/admin/users/{id}/roles", put(handlers::users::set_roles))
        // Services catalogue
        .route("/create/service", post(handlers::services::create_service))
        .route("/update/service/{id}", put(handlers::services::update_service))
        .route("/delete/service/{id}", delete(handlers::services::delete_service))
        // Tasks
        .route("/create/task", post(handlers::tasks::create_task))
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/update/task/{id}/status", put(handlers::tasks::update_task_status))
        .route("/delete/task/{id}", delete(handlers::tasks::delete_task))
        // Favorites
        .route("/favorites", get(handlers::favorites::list_favorites))
        .route(
            "/favorites/{service_id}",
            post(handlers::favorites::add_favorite).delete(handlers::favorites::remove_favorite),
        )
        // Quotes
        .route("/create/devis", post(handlers::quotes::create_quote))
        .route("/devis", get(handlers::quotes::list_quotes))
        .route("/update/devis/{id}", put(handlers::quotes::update_quote))
        .route("/delete/devis/{id}", delete(handlers::quotes::delete_quote))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_allowed_origins);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
