//! Candidate records flowing through the search pipeline.
//!
//! [`RawFeature`] is what the candidate search returns, [`ScoredCandidate`]
//! carries the relevance score, and [`ResolvedBoundary`] is the user-facing
//! record built once geometry has been assembled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BoundaryGeometry, CompositeId, ElementKind};
use crate::domain::boundary_area::{bounding_box_area_sq_km, estimate_area_sq_km};

/// Free-form element tags, ordered by key.
pub type Tags = BTreeMap<String, String>;

/// Axis-aligned extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Tagged element returned by the candidate search.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub id: CompositeId,
    pub tags: Tags,
    pub bounding_box: Option<BoundingBox>,
}

impl RawFeature {
    /// Approximate bounding-box area, zero when the box is missing.
    #[must_use]
    pub fn bounding_box_area_sq_km(&self) -> f64 {
        self.bounding_box
            .as_ref()
            .map_or(0.0, bounding_box_area_sq_km)
    }
}

/// Candidate with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    feature: RawFeature,
    bounding_box_area_sq_km: f64,
    score: f64,
}

impl ScoredCandidate {
    #[must_use]
    pub fn new(feature: RawFeature, bounding_box_area_sq_km: f64, score: f64) -> Self {
        Self {
            feature,
            bounding_box_area_sq_km,
            score,
        }
    }

    #[must_use]
    pub fn id(&self) -> CompositeId {
        self.feature.id
    }

    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.feature.tags
    }

    #[must_use]
    pub fn bounding_box_area_sq_km(&self) -> f64 {
        self.bounding_box_area_sq_km
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Boundary kind reported when the element carries no `boundary` tag.
pub const UNSPECIFIED_BOUNDARY_KIND: &str = "unspecified";

/// Candidate whose geometry resolved successfully.
///
/// Immutable once built. The display name falls back to the composite
/// identifier when the element has no `name` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBoundary {
    composite_id: CompositeId,
    kind: ElementKind,
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_level: Option<String>,
    boundary_kind: String,
    area_sq_km: f64,
    geometry: BoundaryGeometry,
    tags: Tags,
    score: f64,
}

impl ResolvedBoundary {
    /// Combine a scored candidate with its assembled geometry.
    #[must_use]
    pub fn new(candidate: ScoredCandidate, geometry: BoundaryGeometry) -> Self {
        let composite_id = candidate.id();
        let score = candidate.score();
        let tags = candidate.feature.tags;
        let display_name = tags
            .get("name")
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| composite_id.to_string());
        let admin_level = tags.get("admin_level").cloned();
        let boundary_kind = tags
            .get("boundary")
            .cloned()
            .unwrap_or_else(|| UNSPECIFIED_BOUNDARY_KIND.to_owned());
        let area_sq_km = estimate_area_sq_km(&geometry);

        Self {
            composite_id,
            kind: composite_id.kind(),
            display_name,
            admin_level,
            boundary_kind,
            area_sq_km,
            geometry,
            tags,
            score,
        }
    }

    #[must_use]
    pub fn composite_id(&self) -> CompositeId {
        self.composite_id
    }
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
    #[must_use]
    pub fn admin_level(&self) -> Option<&str> {
        self.admin_level.as_deref()
    }
    #[must_use]
    pub fn boundary_kind(&self) -> &str {
        self.boundary_kind.as_str()
    }
    #[must_use]
    pub fn area_sq_km(&self) -> f64 {
        self.area_sq_km
    }
    #[must_use]
    pub fn geometry(&self) -> &BoundaryGeometry {
        &self.geometry
    }
    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}
