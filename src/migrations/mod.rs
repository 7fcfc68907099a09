// Embedded Diesel migrations for PostgreSQL
// Bundled into the binary; diesel_migrations needs a sync connection, so the
// runner works on the blocking pool with its own short-lived PgConnection

use diesel::{Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use std::error::Error;
use tracing::{debug, info};

use crate::app_config::AppConfig;
use crate::db::diesel_pool::MIGRATIONS;

type MigrationResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Run all pending migrations. Returns the number applied.
pub async fn run_migrations(database_url: &str) -> MigrationResult<usize> {
    let database_url = database_url.to_string();

    let applied = tokio::task::spawn_blocking(move || -> MigrationResult<usize> {
        debug!("[MIGRATIONS] Establishing sync connection...");
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| format!("Failed to run migrations: {}", e))?;

        for migration in &applied {
            debug!("[MIGRATIONS] Applied migration: {}", migration);
        }
        Ok(applied.len())
    })
    .await
    .map_err(|e| format!("Migration task panicked: {}", e))??;

    if applied > 0 {
        info!("[MIGRATIONS] Applied {} migrations", applied);
    } else {
        info!("[MIGRATIONS] Schema up to date");
    }
    Ok(applied)
}

/// Migration status information
#[derive(Debug)]
pub struct MigrationStatus {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Report applied and pending migrations without changing anything
pub async fn check_migration_status(database_url: &str) -> MigrationResult<MigrationStatus> {
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || -> MigrationResult<MigrationStatus> {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| format!("Failed to establish sync connection: {}", e))?;

        let applied = conn
            .applied_migrations()
            .map_err(|e| format!("Failed to get applied migrations: {}", e))?;
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(|e| format!("Failed to get pending migrations: {}", e))?;

        Ok(MigrationStatus {
            applied: applied.iter().map(|m| m.to_string()).collect(),
            pending: pending.iter().map(|m| m.name().to_string()).collect(),
        })
    })
    .await
    .map_err(|e| format!("Status check task panicked: {}", e))?
}

/// Migrations run at startup unless explicitly disabled
pub fn should_run_migrations(config: &AppConfig) -> bool {
    !config.disable_embedded_migrations
}
