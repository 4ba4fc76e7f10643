//! DocVault entry-point: loads settings, wires adapters, and serves pages.

mod server;

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use docvault::inbound::http::health::HealthState;
use docvault::inbound::http::session_config::{
    BuildMode, KeySource, key_fingerprint, session_settings_from_env,
};
use docvault::outbound::persistence::{DbPool, PoolConfig, apply_migrations_logged};
use docvault::outbound::storage::CapStdUploadStore;
use server::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|error| io::Error::other(format!("failed to load settings: {error}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let policy = settings.upload_policy().map_err(io::Error::other)?;
    let max_upload_bytes = settings.max_upload_bytes().map_err(io::Error::other)?;

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    match &session.key_source {
        KeySource::File(path) => info!(
            path = %path.display(),
            fingerprint = %key_fingerprint(&session.key),
            "session key loaded"
        ),
        KeySource::Ephemeral => warn!(
            fingerprint = %key_fingerprint(&session.key),
            "using temporary session key; sessions end on restart"
        ),
    }

    let upload_dir = settings.upload_dir();
    let store = CapStdUploadStore::open(&upload_dir).map_err(|error| {
        io::Error::other(format!(
            "failed to open upload directory {}: {error}",
            upload_dir.display()
        ))
    })?;
    info!(path = %upload_dir.display(), "upload directory ready");

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        bind_addr,
        Arc::new(store),
    )
    .with_upload_limits(policy, max_upload_bytes);

    if let Some(database_url) = settings.database_url.clone() {
        if !apply_migrations_logged(database_url.clone()).await {
            warn!("continuing with an unverified database schema");
        }
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting server");
    let server = create_server(health_state, config)?;
    server.await
}
