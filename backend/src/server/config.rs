//! Process settings and the HTTP server configuration built from them.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use recipe_backend::inbound::http::session_config::SessionSettings;
use recipe_backend::outbound::persistence::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig,
};
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";

/// Settings loaded from CLI flags, `RECIPES_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Directory receiving uploaded recipe images.
    #[ortho_config(default = PathBuf::from(DEFAULT_MEDIA_ROOT))]
    pub media_root: PathBuf,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_checkout_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let timeout = self
            .db_checkout_timeout_secs
            .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_secs);
        Some(
            PoolConfig::new(url)
                .with_max_connections(self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
                .with_checkout_timeout(timeout),
        )
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: String,
    pub(crate) media_root: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration serving from memory with images under `media_root`.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: impl Into<String>, media_root: PathBuf) -> Self {
        Self {
            session,
            bind_addr: bind_addr.into(),
            media_root,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Persist through PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Settings precedence and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "RECIPES_BIND_ADDR",
        "RECIPES_DATABASE_URL",
        "RECIPES_MEDIA_ROOT",
        "RECIPES_DB_MAX_CONNECTIONS",
        "RECIPES_DB_CHECKOUT_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("recipe-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_without_configuration() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.media_root, PathBuf::from(DEFAULT_MEDIA_ROOT));
        assert!(settings.pool_config().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://recipes@localhost/recipes".to_owned()),
            ),
            ("RECIPES_MEDIA_ROOT", Some("/srv/media".to_owned())),
            ("RECIPES_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("RECIPES_DB_CHECKOUT_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr, "127.0.0.1:9000");
        assert_eq!(settings.media_root, PathBuf::from("/srv/media"));
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://recipes@localhost/recipes");
        assert_eq!(pool.max_connections(), 4);
    }
}
