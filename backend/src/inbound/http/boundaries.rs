//! Boundary search HTTP handler.
//!
//! ```text
//! GET /api/v1/boundaries/search?cityName=Springfield&country=United%20States
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BoundarySearchRequest, Error, MAX_RESULT_LIMIT};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedCaller;
use crate::inbound::http::boundary_body::{BoundarySearchResponse, ResolvedBoundaryBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_limit_error, parse_country_code, require_text,
};

const CITY_NAME: FieldName = FieldName::new("cityName");
const COUNTRY: FieldName = FieldName::new("country");
const COUNTRY_CODE: FieldName = FieldName::new("countryCode");
const LIMIT: FieldName = FieldName::new("limit");

/// Query string for a boundary search.
///
/// Every field is optional at the extractor level so that missing values
/// surface as structured validation errors.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundarySearchParams {
    pub city_name: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub limit: Option<String>,
}

fn parse_limit(raw: &str) -> Result<usize, Error> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|limit| (1..=MAX_RESULT_LIMIT).contains(limit))
        .ok_or_else(|| invalid_limit_error(LIMIT, raw, MAX_RESULT_LIMIT))
}

fn parse_search_params(
    params: BoundarySearchParams,
    default_limit: usize,
) -> Result<BoundarySearchRequest, Error> {
    let city_name = require_text(params.city_name, CITY_NAME)?;
    let country = require_text(params.country, COUNTRY)?;
    let limit = match params.limit.as_deref() {
        Some(raw) => parse_limit(raw)?,
        None => default_limit,
    };

    let mut request = BoundarySearchRequest::new(city_name, country)?.with_result_limit(limit)?;
    if let Some(raw) = params
        .country_code
        .as_deref()
        .filter(|code| !code.trim().is_empty())
    {
        request = request.with_country_code(parse_country_code(raw, COUNTRY_CODE)?);
    }
    Ok(request)
}

/// Search administrative boundaries for a city name.
#[utoipa::path(
    get,
    path = "/api/v1/boundaries/search",
    description = "Resolve and rank candidate boundaries for a city name within one country.",
    params(
        ("cityName" = String, Query, description = "City name as typed by the user"),
        ("country" = String, Query, description = "Country name, e.g. \"United Kingdom\""),
        ("countryCode" = Option<String>, Query, description = "ISO 3166-1 alpha-2 override"),
        ("limit" = Option<u32>, Query, description = "Number of results, 1 to 20")
    ),
    responses(
        (status = 200, description = "Ranked boundaries", body = BoundarySearchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Unknown country", body = ErrorSchema),
        (status = 502, description = "Boundary source unavailable", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["boundaries"],
    operation_id = "searchBoundaries",
    security(("BearerAuth" = []))
)]
#[get("/boundaries/search")]
pub async fn search_boundaries(
    state: web::Data<HttpState>,
    _caller: AuthenticatedCaller,
    query: web::Query<BoundarySearchParams>,
) -> ApiResult<web::Json<BoundarySearchResponse>> {
    let request = parse_search_params(query.into_inner(), state.default_result_limit)?;
    let boundaries = state.search.search(request).await?;
    Ok(web::Json(BoundarySearchResponse {
        boundaries: boundaries.iter().map(ResolvedBoundaryBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "boundaries_tests.rs"]
mod tests;
