//! Domain primitives, services, and ports.
//!
//! Purpose: resolve administrative boundaries for a city name, rank them, and
//! manage the one selected boundary per city. Everything here is transport
//! agnostic; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: transport error payload and stable codes.
//! - BoundarySearchService: the search pipeline behind `BoundarySearchQuery`.
//! - BoundarySelectionService: selection manager behind the selection ports.
//! - Boundary model types (`RawFeature`, `ScoredCandidate`,
//!   `ResolvedBoundary`, `BoundaryGeometry`, `BoundarySelection`).

pub mod boundary;
pub mod boundary_area;
pub mod boundary_geometry;
pub mod boundary_scoring;
pub mod boundary_search_service;
pub mod boundary_selection_service;
pub mod country;
pub mod error;
pub mod identity;
pub mod ports;
pub mod resolution_error;
pub mod trace_id;

pub use self::boundary::{
    BoundaryGeometry, BoundarySearchRequest, BoundarySelection, BoundaryValidationError,
    BoundingBox, CityId, CompositeId, Coordinate, DEFAULT_RESULT_LIMIT, ElementKind,
    MAX_RESULT_LIMIT, RawFeature, ResolvedBoundary, Ring, ScoredCandidate, Tags,
};
pub use self::boundary_area::{bounding_box_area_sq_km, estimate_area_sq_km};
pub use self::boundary_geometry::{GeometryResolver, assemble_geometry};
pub use self::boundary_scoring::{ScoringContext, rank_candidates, score_candidate};
pub use self::boundary_search_service::{
    BoundarySearchService, DEFAULT_MAX_CONCURRENT_GEOMETRY_FETCHES,
};
pub use self::boundary_selection_service::BoundarySelectionService;
pub use self::country::{TerritoryCode, TerritoryCodeError, UnknownCountry, resolve_country};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{UserId, UserIdValidationError};
pub use self::resolution_error::BoundaryResolutionError;
pub use self::trace_id::TraceId;
