//! bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! Every Diesel repository holds a cheap clone of [`DbPool`] and checks a
//! connection out per operation. Checkout and build failures surface as
//! [`PoolError`], which the repositories map to their port's `Connection`
//! variant.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Default upper bound on open connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time to wait for a free connection.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Checkout failure.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Build failure.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool settings.
///
/// ```
/// use std::time::Duration;
/// use recipe_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://recipes@localhost/recipes")
///     .with_max_connections(4)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_connections(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Settings for `database_url` with default limits.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the number of open connections. Zero is raised to one.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Bound the wait for a free connection.
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Upper bound on open connections.
    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    fn manager(&self) -> AsyncDieselConnectionManager<AsyncPgConnection> {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&self.database_url)
    }
}

/// Shared PostgreSQL connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its first connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when the database is unreachable or the
    /// URL is invalid.
    pub async fn connect(config: &PoolConfig) -> Result<Self, PoolError> {
        let inner = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.checkout_timeout)
            .min_idle(Some(1))
            .build(config.manager())
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Build the pool without touching the database. Connections open on
    /// first checkout.
    pub fn lazy(config: &PoolConfig) -> Self {
        Self {
            inner: Pool::builder()
                .max_size(config.max_connections)
                .connection_timeout(config.checkout_timeout)
                .build_unchecked(config.manager()),
        }
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] when none is available within the
    /// checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_until_overridden() {
        let config = PoolConfig::new("postgres://localhost/recipes");

        assert_eq!(config.database_url(), "postgres://localhost/recipes");
        assert_eq!(config.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(25, 25)]
    fn max_connections_is_at_least_one(#[case] requested: u32, #[case] expected: u32) {
        let config =
            PoolConfig::new("postgres://localhost/recipes").with_max_connections(requested);
        assert_eq!(config.max_connections(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn lazy_pools_fail_at_checkout_not_construction() {
        let config = PoolConfig::new("postgres://nobody@127.0.0.1:1/none")
            .with_checkout_timeout(Duration::from_millis(200));
        let pool = DbPool::lazy(&config);

        let err = pool.get().await.err().expect("checkout must fail");
        assert!(matches!(err, PoolError::Checkout { .. }));
    }
}
