//! Per-city boundary selection HTTP handlers.
//!
//! ```text
//! PUT    /api/v1/cities/{city_id}/boundary
//! GET    /api/v1/cities/{city_id}/boundary
//! DELETE /api/v1/cities/{city_id}/boundary
//! GET    /api/v1/cities/{city_id}/boundary/geojson
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::SelectBoundaryRequest;
use crate::domain::{BoundarySelection, CityId, CompositeId, ElementKind, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::boundary_body::{BoundarySelectionBody, selection_feature_collection};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_city_id, parse_composite_id, require_text,
};

const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

/// Path parameters shared by the selection routes.
#[derive(Debug, Deserialize)]
pub struct CityPath {
    pub city_id: String,
}

/// Request payload naming the element to select.
///
/// Only the element reference is accepted; geometry is always resolved
/// server-side.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectBoundaryBody {
    /// `relation/<id>` or `way/<id>`.
    #[schema(example = "relation/161950")]
    pub composite_id: Option<String>,
    /// Optional element kind; must agree with `compositeId` when present.
    #[schema(example = "relation")]
    pub kind: Option<String>,
}

fn parse_city(path: CityPath) -> Result<CityId, Error> {
    parse_city_id(path.city_id, FieldName::new("cityId"))
}

fn parse_select_body(body: SelectBoundaryBody) -> Result<CompositeId, Error> {
    let raw = require_text(body.composite_id, FieldName::new("compositeId"))?;
    let composite_id = parse_composite_id(raw.trim(), FieldName::new("compositeId"))?;
    if let Some(kind) = body.kind.as_deref() {
        let kind = kind
            .trim()
            .parse::<ElementKind>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if kind != composite_id.kind() {
            return Err(Error::invalid_request("kind does not match compositeId")
                .with_details(json!({
                    "field": "kind",
                    "value": kind.as_str(),
                    "compositeId": composite_id.to_string(),
                })));
        }
    }
    Ok(composite_id)
}

fn selection_not_found(city_id: &CityId) -> Error {
    Error::not_found(format!("city {city_id} has no boundary selection"))
        .with_details(json!({ "cityId": city_id.as_str() }))
}

async fn require_selection(
    state: &HttpState,
    city_id: CityId,
) -> Result<BoundarySelection, Error> {
    let lookup = city_id.clone();
    state
        .selection_query
        .get_selection(lookup)
        .await?
        .ok_or_else(|| selection_not_found(&city_id))
}

/// Pin an element's boundary to a city.
#[utoipa::path(
    put,
    path = "/api/v1/cities/{city_id}/boundary",
    description = "Re-resolve the element's geometry and make it the city's only active boundary.",
    params(("city_id" = String, Path, description = "Partner city identifier")),
    request_body = SelectBoundaryBody,
    responses(
        (status = 200, description = "Selection stored", body = BoundarySelectionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 502, description = "Boundary source unavailable", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["selections"],
    operation_id = "selectCityBoundary",
    security(("BearerAuth" = []))
)]
#[put("/cities/{city_id}/boundary")]
pub async fn select_city_boundary(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<CityPath>,
    payload: Option<web::Json<SelectBoundaryBody>>,
) -> ApiResult<web::Json<BoundarySelectionBody>> {
    let city_id = parse_city(path.into_inner())?;
    let payload = payload.ok_or_else(|| missing_field_error(FieldName::new("compositeId")))?;
    let composite_id = parse_select_body(payload.into_inner())?;

    let selection = state
        .selection
        .select_boundary(SelectBoundaryRequest {
            city_id,
            composite_id,
            selected_by: caller.into_user_id(),
        })
        .await?;
    Ok(web::Json(BoundarySelectionBody::from(&selection)))
}

/// Fetch the city's active selection.
#[utoipa::path(
    get,
    path = "/api/v1/cities/{city_id}/boundary",
    params(("city_id" = String, Path, description = "Partner city identifier")),
    responses(
        (status = 200, description = "Active selection", body = BoundarySelectionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No selection", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["selections"],
    operation_id = "getCityBoundary",
    security(("BearerAuth" = []))
)]
#[get("/cities/{city_id}/boundary")]
pub async fn get_city_boundary(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<CityPath>,
) -> ApiResult<web::Json<BoundarySelectionBody>> {
    let city_id = parse_city(path.into_inner())?;
    let selection = require_selection(&state, city_id).await?;
    Ok(web::Json(BoundarySelectionBody::from(&selection)))
}

/// Clear the city's selection so the authoritative boundary applies again.
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{city_id}/boundary",
    params(("city_id" = String, Path, description = "Partner city identifier")),
    responses(
        (status = 204, description = "Default boundary restored"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["selections"],
    operation_id = "restoreDefaultCityBoundary",
    security(("BearerAuth" = []))
)]
#[delete("/cities/{city_id}/boundary")]
pub async fn restore_default_city_boundary(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<CityPath>,
) -> ApiResult<HttpResponse> {
    let city_id = parse_city(path.into_inner())?;
    state.selection.restore_default(city_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Download the city's selected boundary as a GeoJSON feature collection.
#[utoipa::path(
    get,
    path = "/api/v1/cities/{city_id}/boundary/geojson",
    params(("city_id" = String, Path, description = "Partner city identifier")),
    responses(
        (
            status = 200,
            description = "FeatureCollection with one feature",
            content_type = "application/geo+json",
            body = Object
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No selection", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["selections"],
    operation_id = "downloadCityBoundaryGeoJson",
    security(("BearerAuth" = []))
)]
#[get("/cities/{city_id}/boundary/geojson")]
pub async fn download_city_boundary_geojson(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    path: web::Path<CityPath>,
) -> ApiResult<HttpResponse> {
    let city_id = parse_city(path.into_inner())?;
    let selection = require_selection(&state, city_id).await?;
    Ok(HttpResponse::Ok()
        .content_type(GEOJSON_CONTENT_TYPE)
        .json(selection_feature_collection(&selection)))
}

#[cfg(test)]
#[path = "selections_tests.rs"]
mod tests;
