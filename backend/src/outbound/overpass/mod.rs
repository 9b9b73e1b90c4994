//! Overpass outbound adapters.
//!
//! This module provides the HTTP implementation of the `BoundarySource` port.

mod dto;
mod http_source;
mod query;

pub use http_source::{
    DEFAULT_CANDIDATE_QUERY_TIMEOUT_SECONDS, DEFAULT_GEOMETRY_QUERY_TIMEOUT_SECONDS,
    OverpassHttpBoundarySource, OverpassHttpIdentity,
};
