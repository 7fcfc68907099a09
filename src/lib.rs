// Library exports for the marketplace backend
// main.rs and the integration tests build the app through these

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::{build_router, AppState};
pub use app_config::{AppConfig, ConfigError};
pub use db::{with_connection, DieselPool, PoolError};
pub use middleware::{auth_middleware, require_admin, AuthenticatedUser};
pub use models::auth::{TokenClaims, TokenSubject};
pub use services::{JwtConfig, JwtError, JwtService};
pub use utils::ApiError;

/// Build the pool, run migrations if enabled and assemble the shared state
pub async fn initialize_app_state(
    config: AppConfig,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    use tracing::info;

    info!(
        "Initializing database pool for {}",
        db::mask_connection_string(&config.database.url)
    );
    let db_config = db::DieselDatabaseConfig::from(&config.database);
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    if migrations::should_run_migrations(&config) {
        info!("Running embedded migrations...");
        migrations::run_migrations(&config.database.url)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    } else {
        info!("Embedded migrations disabled");
    }

    Ok(AppState::new(config, diesel_pool))
}
