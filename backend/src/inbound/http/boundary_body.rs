//! Response bodies for resolved boundaries and selections.
//!
//! Geometry is emitted as GeoJSON through the `geojson` crate: searches embed
//! a geometry per boundary, downloads wrap the stored selection in a
//! `FeatureCollection`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{BoundaryGeometry, BoundarySelection, Ring, ResolvedBoundary, Tags};

/// Resolved boundary as returned by the search endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBoundaryBody {
    /// `way/<id>` or `relation/<id>`.
    #[schema(example = "relation/161950")]
    pub composite_id: String,
    #[schema(example = "relation")]
    pub kind: String,
    #[schema(example = "Springfield")]
    pub display_name: String,
    #[schema(example = "8")]
    pub admin_level: Option<String>,
    #[schema(example = "administrative")]
    pub boundary_kind: String,
    pub area_sq_km: f64,
    pub score: f64,
    #[schema(value_type = Object)]
    pub tags: Tags,
    /// GeoJSON `Polygon` or `MultiPolygon`.
    #[schema(value_type = Object)]
    pub geometry: Geometry,
}

impl From<&ResolvedBoundary> for ResolvedBoundaryBody {
    fn from(value: &ResolvedBoundary) -> Self {
        Self {
            composite_id: value.composite_id().to_string(),
            kind: value.kind().to_string(),
            display_name: value.display_name().to_owned(),
            admin_level: value.admin_level().map(str::to_owned),
            boundary_kind: value.boundary_kind().to_owned(),
            area_sq_km: value.area_sq_km(),
            score: value.score(),
            tags: value.tags().clone(),
            geometry: to_geojson_geometry(value.geometry()),
        }
    }
}

/// Search response envelope, ordered by descending score.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoundarySearchResponse {
    pub boundaries: Vec<ResolvedBoundaryBody>,
}

/// Active boundary selection for a city.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundarySelectionBody {
    #[schema(example = "us-springfield-il")]
    pub city_id: String,
    #[schema(example = "relation/161950")]
    pub composite_id: String,
    /// RFC 3339 timestamp.
    pub selected_at: String,
    pub selected_by: String,
    pub boundary: ResolvedBoundaryBody,
}

impl From<&BoundarySelection> for BoundarySelectionBody {
    fn from(value: &BoundarySelection) -> Self {
        Self {
            city_id: value.city_id().to_string(),
            composite_id: value.composite_id().to_string(),
            selected_at: value.selected_at().to_rfc3339(),
            selected_by: value.selected_by().to_string(),
            boundary: ResolvedBoundaryBody::from(value.boundary()),
        }
    }
}

fn ring_positions(ring: &Ring) -> Vec<Vec<f64>> {
    ring.points()
        .iter()
        .map(|point| vec![point.longitude, point.latitude])
        .collect()
}

pub(crate) fn to_geojson_geometry(geometry: &BoundaryGeometry) -> Geometry {
    let value = match geometry {
        BoundaryGeometry::Polygon(ring) => Value::Polygon(vec![ring_positions(ring)]),
        BoundaryGeometry::MultiPolygon(rings) => Value::MultiPolygon(
            rings
                .iter()
                .map(|ring| vec![ring_positions(ring)])
                .collect(),
        ),
    };
    Geometry::new(value)
}

/// Stored selection as a one-feature collection.
///
/// Element tags are flattened into `properties` alongside `compositeId`,
/// `displayName`, and `areaSqKm`; the synthetic keys win on collision.
pub(crate) fn selection_feature_collection(selection: &BoundarySelection) -> FeatureCollection {
    let boundary = selection.boundary();
    let mut properties: JsonObject = boundary
        .tags()
        .iter()
        .map(|(key, value)| (key.clone(), json!(value)))
        .collect();
    properties.insert(
        "compositeId".to_owned(),
        json!(boundary.composite_id().to_string()),
    );
    properties.insert("displayName".to_owned(), json!(boundary.display_name()));
    properties.insert("areaSqKm".to_owned(), json!(boundary.area_sq_km()));

    let feature = Feature {
        bbox: None,
        geometry: Some(to_geojson_geometry(boundary.geometry())),
        id: Some(Id::String(boundary.composite_id().to_string())),
        properties: Some(properties),
        foreign_members: None,
    };
    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}
