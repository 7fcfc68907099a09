// Health check

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{app::AppState, db};

/// GET /health: one round trip through the connection wrapper
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let result = db::check_diesel_health(&state.diesel_pool).await;
    let pool_state = state.diesel_pool.state();

    let (status, healthy, error) = match result {
        Ok(()) => (StatusCode::OK, true, None),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false, Some("Database connection failed"))
        },
    };

    let response = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "marketplace-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": {
                "status": if healthy { "healthy" } else { "unhealthy" },
                "max_connections": state.config.database.max_connections,
                "connections": pool_state.connections,
                "idle_connections": pool_state.idle_connections,
                "error": error,
            }
        }
    });

    (status, Json(response))
}
