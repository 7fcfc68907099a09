// Scoped connection acquisition
// Every store access in the crate goes through `with_connection`

use bb8::{ManageConnection, Pool, RunError};
use futures_util::future::BoxFuture;
use thiserror::Error;

/// Failures of the acquisition step itself, never of the business operation
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("connection pool exhausted")]
    Exhausted,

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("connection task aborted: {0}")]
    Aborted(String),
}

impl PoolError {
    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, PoolError::Exhausted | PoolError::Unreachable(_))
    }
}

impl<E: std::fmt::Debug> From<RunError<E>> for PoolError {
    fn from(err: RunError<E>) -> Self {
        match err {
            RunError::TimedOut => PoolError::Exhausted,
            RunError::User(e) => PoolError::Unreachable(format!("{:?}", e)),
        }
    }
}

/// Check out one connection, run `op` on it, hand it back.
///
/// The operation runs on its own task, so it completes (and the connection goes
/// back to the pool) even if the awaiting request future is dropped mid-flight.
/// The connection is returned before the result reaches the caller, on success,
/// on error and on panic alike. Nothing is retried here.
///
/// ```ignore
/// let user = with_connection(&state.diesel_pool, move |conn| {
///     Box::pin(async move { User::find_by_email(conn, &email).await.map_err(ApiError::from) })
/// })
/// .await?;
/// ```
pub async fn with_connection<M, F, T, E>(pool: &Pool<M>, op: F) -> Result<T, E>
where
    M: ManageConnection,
    F: for<'c> FnOnce(&'c mut M::Connection) -> BoxFuture<'c, Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<PoolError> + Send + 'static,
{
    let pool = pool.clone();

    let task = tokio::spawn(async move {
        let mut conn = match pool.get_owned().await {
            Ok(conn) => conn,
            Err(e) => {
                let err = PoolError::from(e);
                tracing::error!("Failed to check out a database connection: {}", err);
                return Err(E::from(err));
            },
        };

        let result = op(&mut *conn).await;

        // Release before the result leaves the task
        drop(conn);
        result
    });

    match task.await {
        Ok(result) => result,
        Err(join_err) => {
            tracing::error!("Connection-scoped operation aborted: {}", join_err);
            Err(E::from(PoolError::Aborted(join_err.to_string())))
        },
    }
}
