pub mod connection;
pub mod diesel_pool;

pub use connection::{with_connection, PoolError};
pub use diesel_pool::{
    create_diesel_pool, create_lazy_diesel_pool, mask_connection_string, DieselDatabaseConfig,
    DieselPool,
};

/// Health check for database pool: one round trip through the scoped wrapper
pub async fn check_diesel_health(pool: &DieselPool) -> Result<(), PoolError> {
    with_connection(pool, |_conn| Box::pin(async { Ok::<(), PoolError>(()) })).await
}
