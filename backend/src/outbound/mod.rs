//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **overpass**: the geospatial query service behind `BoundarySource`
//! - **persistence**: PostgreSQL and in-process selection repositories
//! - **identity**: bearer token verification against the identity provider
//!
//! Adapters translate between domain types and wire or storage formats. They
//! contain no ranking or selection logic.

pub mod identity;
pub mod overpass;
pub mod persistence;
