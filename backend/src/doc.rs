//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: boundary search, per-city selection, and health endpoints
//! - **Schemas**: response bodies plus the [`ErrorSchema`] and
//!   [`ErrorCodeSchema`] wrappers that describe domain errors without
//!   coupling them to utoipa
//! - **Security**: bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::boundary_body::{
    BoundarySearchResponse, BoundarySelectionBody, ResolvedBoundaryBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::selections::SelectBoundaryBody;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Session token verified by the identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "City boundaries API",
        description = "Administrative boundary search, ranking, and per-city selection.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::boundaries::search_boundaries,
        crate::inbound::http::selections::select_city_boundary,
        crate::inbound::http::selections::get_city_boundary,
        crate::inbound::http::selections::restore_default_city_boundary,
        crate::inbound::http::selections::download_city_boundary_geojson,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ResolvedBoundaryBody,
        BoundarySearchResponse,
        BoundarySelectionBody,
        SelectBoundaryBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "boundaries", description = "Boundary search and ranking"),
        (name = "selections", description = "Per-city boundary selection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
