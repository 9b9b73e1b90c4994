//! Test helpers for inbound HTTP components.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    BoundaryGeometry, BoundarySelection, CityId, CompositeId, Coordinate, ElementKind, RawFeature,
    ResolvedBoundary, Ring, ScoredCandidate, UserId,
};

/// Authorisation header value accepted by the fixture identity verifier.
pub const TEST_BEARER: &str = "Bearer test-token";

/// Unit-square boundary named `name`, scored `score`.
pub fn resolved_boundary(external_id: i64, name: &str, score: f64) -> ResolvedBoundary {
    let feature = RawFeature {
        id: CompositeId::new(ElementKind::Relation, external_id),
        tags: BTreeMap::from([
            ("name".to_owned(), name.to_owned()),
            ("boundary".to_owned(), "administrative".to_owned()),
            ("admin_level".to_owned(), "8".to_owned()),
        ]),
        bounding_box: None,
    };
    let ring = Ring::close(vec![
        Coordinate::new(-89.7, 39.7),
        Coordinate::new(-89.6, 39.7),
        Coordinate::new(-89.6, 39.8),
        Coordinate::new(-89.7, 39.8),
    ])
    .expect("valid ring");
    ResolvedBoundary::new(
        ScoredCandidate::new(feature, 0.0, score),
        BoundaryGeometry::Polygon(ring),
    )
}

pub fn selected_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Selection of [`resolved_boundary`] for `city_id`.
pub fn boundary_selection(city_id: &str) -> BoundarySelection {
    BoundarySelection::new(
        CityId::new(city_id).expect("valid city id"),
        resolved_boundary(161_950, "Springfield", 0.0),
        selected_at(),
        UserId::new("user-1").expect("valid user id"),
    )
}
