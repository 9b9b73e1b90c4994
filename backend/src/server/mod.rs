//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{BoundaryServerSettings, ServerConfig};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use city_boundaries::Trace;
#[cfg(debug_assertions)]
use city_boundaries::doc::ApiDoc;
use city_boundaries::domain::Error;
use city_boundaries::inbound::http::boundaries::search_boundaries;
use city_boundaries::inbound::http::health::{HealthState, live, ready};
use city_boundaries::inbound::http::selections::{
    download_city_boundary_geojson, get_city_boundary, restore_default_city_boundary,
    select_city_boundary,
};
use city_boundaries::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Malformed JSON bodies use the standard error payload.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("request body is not valid JSON: {err}")).into()
    })
}

pub(crate) fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(json_config())
        .service(search_boundaries)
        .service(download_city_boundary_geojson)
        .service(select_city_boundary)
        .service(get_city_boundary)
        .service(restore_default_city_boundary);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built or binding
/// the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "city boundaries server listening");
    health_state.mark_ready();
    Ok(server)
}
