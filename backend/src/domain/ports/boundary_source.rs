//! Driven port for the geospatial query service.
//!
//! Two query shapes are needed: a cheap candidate search returning tags and
//! bounding boxes only, and a per-element fetch returning the full node and
//! way graph needed to assemble a polygon.

use std::collections::HashMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CompositeId, Coordinate, RawFeature, Tags, TerritoryCode};

/// Stage-one search for boundary candidates by name within a territory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSearch {
    /// Free-text city name; adapters must escape it before embedding.
    pub city_name: String,
    /// Territory scoping the search.
    pub territory: TerritoryCode,
}

/// Kind of a relation member reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}

/// One member reference of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMember {
    pub kind: MemberKind,
    pub id: i64,
    /// Role such as `outer`, `inner`, or `admin_centre`; may be empty.
    pub role: String,
}

/// Way as an ordered list of node references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawWay {
    pub node_ids: Vec<i64>,
    pub tags: Tags,
}

/// Relation as an ordered list of members.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRelation {
    pub members: Vec<RelationMember>,
    pub tags: Tags,
}

/// Elements returned by a recursive geometry fetch, keyed by identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementGraph {
    pub nodes: HashMap<i64, Coordinate>,
    pub ways: HashMap<i64, RawWay>,
    pub relations: HashMap<i64, RawRelation>,
}

define_port_error! {
    /// Errors surfaced while calling the geospatial query service.
    pub enum BoundarySourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "boundary source transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "boundary source timeout: {message}",
        /// The service rate-limited the request.
        RateLimited { message: String } =>
            "boundary source rate limited request: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "boundary source response decode failed: {message}",
        /// The service rejected the query.
        InvalidRequest { message: String } =>
            "boundary source request invalid: {message}",
    }
}

/// Port for querying boundary candidates and their geometry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Find tagged candidates with bounding boxes, in upstream order.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use city_boundaries::domain::ports::{
    ///     BoundarySource, CandidateSearch, FixtureBoundarySource,
    /// };
    ///
    /// let source = FixtureBoundarySource;
    /// let features = source
    ///     .search_candidates(&CandidateSearch {
    ///         city_name: "Springfield".to_owned(),
    ///         territory: "US".parse()?,
    ///     })
    ///     .await?;
    /// assert!(features.is_empty());
    /// ```
    async fn search_candidates(
        &self,
        search: &CandidateSearch,
    ) -> Result<Vec<RawFeature>, BoundarySourceError>;

    /// Fetch one element together with its member ways and nodes.
    async fn fetch_element_graph(&self, id: CompositeId) -> Result<ElementGraph, BoundarySourceError>;
}

/// Fixture implementation returning no data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBoundarySource;

#[async_trait]
impl BoundarySource for FixtureBoundarySource {
    async fn search_candidates(
        &self,
        _search: &CandidateSearch,
    ) -> Result<Vec<RawFeature>, BoundarySourceError> {
        Ok(Vec::new())
    }

    async fn fetch_element_graph(&self, _id: CompositeId) -> Result<ElementGraph, BoundarySourceError> {
        Ok(ElementGraph::default())
    }
}
