//! Backend entry-point: loads settings, connects storage and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use recipe_backend::outbound::persistence::DbPool;
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        session,
        settings.bind_addr.clone(),
        settings.media_root.clone(),
    );
    if let Some(pool_config) = settings.pool_config() {
        let pool = DbPool::connect(&pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(server::build_metrics());
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(bind_addr = %settings.bind_addr, "server listening");

    let result = server.await;
    health_state.mark_draining();
    result
}
