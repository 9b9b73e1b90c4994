//! Administrative boundary domain types.
//!
//! Candidates move through three explicit record types: [`RawFeature`] from
//! the candidate search, [`ScoredCandidate`] after ranking, and
//! [`ResolvedBoundary`] once geometry has been assembled. A
//! [`BoundarySelection`] pins one resolved boundary to a city.

use std::fmt;

mod candidate;
mod element;
mod geometry;
mod search_request;
mod selection;

pub use candidate::{
    BoundingBox, RawFeature, ResolvedBoundary, ScoredCandidate, Tags, UNSPECIFIED_BOUNDARY_KIND,
};
pub use element::{CompositeId, ElementKind};
pub use geometry::{BoundaryGeometry, Coordinate, MIN_DISTINCT_RING_POINTS, Ring};
pub use search_request::{BoundarySearchRequest, DEFAULT_RESULT_LIMIT, MAX_RESULT_LIMIT};
pub use selection::{BoundarySelection, CITY_ID_MAX, CityId};

/// Validation errors raised by boundary constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryValidationError {
    EmptyCityName,
    EmptyCountry,
    ResultLimitOutOfRange { limit: usize, max: usize },
    UnsupportedElementKind { kind: String },
    InvalidCompositeId { value: String },
    EmptyCityId,
    InvalidCityId { max: usize },
    NonFiniteCoordinate,
    OpenRing,
    DegenerateRing { distinct_points: usize },
    EmptyGeometry,
}

impl fmt::Display for BoundaryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCityName => write!(f, "city name must not be empty"),
            Self::EmptyCountry => write!(f, "country must not be empty"),
            Self::ResultLimitOutOfRange { limit, max } => {
                write!(f, "result limit must be between 1 and {max} (got {limit})")
            }
            Self::UnsupportedElementKind { kind } => {
                write!(f, "element kind must be \"way\" or \"relation\" (got {kind:?})")
            }
            Self::InvalidCompositeId { value } => {
                write!(f, "composite id must look like \"<kind>/<id>\" (got {value:?})")
            }
            Self::EmptyCityId => write!(f, "city id must not be empty"),
            Self::InvalidCityId { max } => write!(
                f,
                "city id must be at most {max} characters without surrounding whitespace or '/'"
            ),
            Self::NonFiniteCoordinate => write!(f, "coordinates must be finite"),
            Self::OpenRing => write!(f, "ring must be closed"),
            Self::DegenerateRing { distinct_points } => write!(
                f,
                "ring needs at least {MIN_DISTINCT_RING_POINTS} distinct points (got {distinct_points})"
            ),
            Self::EmptyGeometry => write!(f, "geometry must contain at least one ring"),
        }
    }
}

impl std::error::Error for BoundaryValidationError {}
