//! Service entry-point: loads settings, wires adapters, and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use city_boundaries::inbound::http::health::HealthState;
use city_boundaries::outbound::persistence::{DbPool, PoolConfig};
use server::{BoundaryServerSettings, ServerConfig, create_server};


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

    let settings = BoundaryServerSettings::load().map_err(std::io::Error::other)?;
    let database_url = settings.database_url().map(str::to_owned);
    let mut config = ServerConfig::from_settings(settings)?;

    if let Some(url) = database_url {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        info!("database pool ready");
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
