//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use city_boundaries::domain::ports::{
    BoundarySelectionCommand, BoundarySelectionQuery, BoundarySelectionRepository,
    BoundarySource, FixtureIdentityVerifier, IdentityVerifier,
};
use city_boundaries::domain::{BoundarySearchService, BoundarySelectionService};
use city_boundaries::inbound::http::state::{HttpState, HttpStatePorts};
use city_boundaries::outbound::identity::HttpIdentityVerifier;
use city_boundaries::outbound::overpass::OverpassHttpBoundarySource;
use city_boundaries::outbound::persistence::{
    DieselBoundarySelectionRepository, InMemoryBoundarySelectionRepository,
};

use super::config::{BoundaryServerSettings, ServerConfig};

type SelectionPorts = (
    Arc<dyn BoundarySelectionCommand>,
    Arc<dyn BoundarySelectionQuery>,
);

/// Share one selection service between the command and query ports.
fn build_selection_ports<R, S>(repository: Arc<R>, source: Arc<S>) -> SelectionPorts
where
    R: BoundarySelectionRepository + 'static,
    S: BoundarySource + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = Arc::new(BoundarySelectionService::new(repository, source, clock));
    (
        service.clone() as Arc<dyn BoundarySelectionCommand>,
        service as Arc<dyn BoundarySelectionQuery>,
    )
}

/// Pick the bearer token verifier.
///
/// Without a configured endpoint, debug builds accept any non-blank token
/// and release builds refuse to start.
pub(crate) fn build_identity_verifier(
    settings: &BoundaryServerSettings,
    timeout: Duration,
) -> std::io::Result<Arc<dyn IdentityVerifier>> {
    match settings.identity_endpoint()? {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "verifying bearer tokens remotely");
            let verifier =
                HttpIdentityVerifier::new(endpoint, timeout).map_err(std::io::Error::other)?;
            Ok(Arc::new(verifier))
        }
        None if cfg!(debug_assertions) => {
            warn!("no identity endpoint configured; accepting any bearer token (dev only)");
            Ok(Arc::new(FixtureIdentityVerifier))
        }
        None => Err(std::io::Error::other(
            "CITY_BOUNDARIES_IDENTITY_ENDPOINT must be set in release builds",
        )),
    }
}

/// Build the shared HTTP state from the resolved server config.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let settings = &config.settings;
    let timeout = settings.http_timeout();

    let source = Arc::new(
        OverpassHttpBoundarySource::with_identity(
            settings.overpass_endpoint()?,
            timeout,
            settings.overpass_identity(),
        )
        .map_err(std::io::Error::other)?,
    );
    let search = Arc::new(
        BoundarySearchService::new(Arc::clone(&source))
            .with_max_concurrent_geometry_fetches(settings.max_concurrent_geometry_fetches()),
    );

    let (selection, selection_query) = match &config.db_pool {
        Some(pool) => {
            info!("storing boundary selections in PostgreSQL");
            build_selection_ports(
                Arc::new(DieselBoundarySelectionRepository::new(pool.clone())),
                Arc::clone(&source),
            )
        }
        None => {
            warn!("no database configured; boundary selections are kept in memory");
            build_selection_ports(
                Arc::new(InMemoryBoundarySelectionRepository::new()),
                Arc::clone(&source),
            )
        }
    };

    let state = HttpState::new(HttpStatePorts {
        search,
        selection,
        selection_query,
        identity: build_identity_verifier(settings, timeout)?,
    })
    .with_default_result_limit(settings.default_result_limit()?);
    Ok(web::Data::new(state))
}
