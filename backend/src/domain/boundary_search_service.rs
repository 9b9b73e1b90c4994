//! Boundary search orchestration.
//!
//! A search walks `Idle → QueryBuilt → CandidatesFetched → CandidatesScored →
//! TopKSelected → GeometryResolving → Resolved`, or ends in `Failed` on a
//! request-level error. Geometry for the top candidates is fetched with
//! bounded concurrency through an order-preserving stream, so each outcome
//! lands in its candidate's rank slot whatever order the fetches finish in.
//! Candidates whose geometry fails are logged and left out.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::boundary_geometry::GeometryResolver;
use crate::domain::boundary_scoring::{ScoringContext, rank_candidates};
use crate::domain::ports::{BoundarySearchQuery, BoundarySource, CandidateSearch};
use crate::domain::{
    BoundaryResolutionError, BoundarySearchRequest, Error, ResolvedBoundary, ScoredCandidate,
    TerritoryCode, resolve_country,
};

/// Geometry fetches allowed in flight for one search by default.
pub const DEFAULT_MAX_CONCURRENT_GEOMETRY_FETCHES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    Idle,
    QueryBuilt,
    CandidatesFetched,
    CandidatesScored,
    TopKSelected,
    GeometryResolving,
    Resolved,
    Failed,
}

/// Phase tracker that logs every transition.
struct SearchProgress {
    phase: SearchPhase,
}

impl SearchProgress {
    fn start() -> Self {
        Self {
            phase: SearchPhase::Idle,
        }
    }

    fn advance(&mut self, next: SearchPhase) {
        debug!(from = ?self.phase, to = ?next, "boundary search phase");
        self.phase = next;
    }

    fn fail(&mut self, error: BoundaryResolutionError) -> BoundaryResolutionError {
        self.advance(SearchPhase::Failed);
        error
    }
}

/// Search service implementing the [`BoundarySearchQuery`] driving port.
pub struct BoundarySearchService<S> {
    source: Arc<S>,
    resolver: GeometryResolver<S>,
    max_concurrent_geometry_fetches: usize,
}

impl<S> Clone for BoundarySearchService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            resolver: self.resolver.clone(),
            max_concurrent_geometry_fetches: self.max_concurrent_geometry_fetches,
        }
    }
}

impl<S> BoundarySearchService<S>
where
    S: BoundarySource,
{
    /// Create a service backed by the given boundary source.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            resolver: GeometryResolver::new(Arc::clone(&source)),
            source,
            max_concurrent_geometry_fetches: DEFAULT_MAX_CONCURRENT_GEOMETRY_FETCHES,
        }
    }

    /// Bound the geometry fan-out. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_geometry_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_geometry_fetches = limit.max(1);
        self
    }

    /// Run one search end to end.
    pub async fn search_boundaries(
        &self,
        request: &BoundarySearchRequest,
    ) -> Result<Vec<ResolvedBoundary>, BoundaryResolutionError> {
        let mut progress = SearchProgress::start();

        let territory = territory_for(request).map_err(|err| progress.fail(err))?;
        let search = CandidateSearch {
            city_name: request.city_name().to_owned(),
            territory,
        };
        progress.advance(SearchPhase::QueryBuilt);

        let features = self
            .source
            .search_candidates(&search)
            .await
            .map_err(|err| {
                progress.fail(BoundaryResolutionError::upstream_unavailable(err.to_string()))
            })?;
        progress.advance(SearchPhase::CandidatesFetched);
        let candidate_count = features.len();
        if features.is_empty() {
            progress.advance(SearchPhase::Resolved);
            info!(
                city_name = request.city_name(),
                territory = %territory,
                "boundary search found no candidates"
            );
            return Ok(Vec::new());
        }

        let context = ScoringContext {
            search_term: request.city_name(),
            territory,
        };
        let ranked = rank_candidates(features, &context, request.result_limit());
        progress.advance(SearchPhase::CandidatesScored);
        progress.advance(SearchPhase::TopKSelected);

        progress.advance(SearchPhase::GeometryResolving);
        let selected = ranked.len();
        let slots: Vec<Option<ResolvedBoundary>> = stream::iter(ranked)
            .map(|candidate| self.resolve_candidate(candidate))
            .buffered(self.max_concurrent_geometry_fetches)
            .collect()
            .await;
        let resolved: Vec<ResolvedBoundary> = slots.into_iter().flatten().collect();
        progress.advance(SearchPhase::Resolved);

        info!(
            city_name = request.city_name(),
            territory = %territory,
            candidates = candidate_count,
            selected,
            resolved = resolved.len(),
            "boundary search resolved"
        );
        Ok(resolved)
    }

    async fn resolve_candidate(&self, candidate: ScoredCandidate) -> Option<ResolvedBoundary> {
        let id = candidate.id();
        match self.resolver.resolve_geometry(id).await {
            Ok(geometry) => Some(ResolvedBoundary::new(candidate, geometry)),
            Err(error) => {
                warn!(composite_id = %id, error = %error, "dropping boundary candidate");
                None
            }
        }
    }
}

fn territory_for(request: &BoundarySearchRequest) -> Result<TerritoryCode, BoundaryResolutionError> {
    match request.country_code() {
        Some(code) => Ok(code),
        None => resolve_country(request.country()).map_err(Into::into),
    }
}

#[async_trait]
impl<S> BoundarySearchQuery for BoundarySearchService<S>
where
    S: BoundarySource,
{
    async fn search(&self, request: BoundarySearchRequest) -> Result<Vec<ResolvedBoundary>, Error> {
        self.search_boundaries(&request).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "boundary_search_service_tests.rs"]
mod tests;
