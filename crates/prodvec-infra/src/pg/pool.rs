//! Connection pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use prodvec_types::config::DatabaseConfig;
use prodvec_types::error::RepositoryError;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Open a pool against the configured service URL.
///
/// Fails fast if no URL is configured or the server is unreachable.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
    let url = config
        .service_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            RepositoryError::Connection(
                "no database URL configured (set TIMESCALE_SERVICE_URL or [database].service_url)"
                    .to_string(),
            )
        })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .map_err(|e| RepositoryError::Connection(e.to_string()))?;

    tracing::debug!(max_connections = config.max_connections, "database pool opened");
    Ok(pool)
}
