//! Driving port for boundary searches.

use async_trait::async_trait;

use crate::domain::{BoundarySearchRequest, Error, ResolvedBoundary};

/// Driving port returning ranked boundaries for a city name.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), city_boundaries::domain::Error> {
/// use city_boundaries::domain::BoundarySearchRequest;
/// use city_boundaries::domain::ports::{BoundarySearchQuery, FixtureBoundarySearchQuery};
///
/// let request = BoundarySearchRequest::new("Springfield", "United States")?;
/// let boundaries = FixtureBoundarySearchQuery.search(request).await?;
/// assert!(boundaries.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundarySearchQuery: Send + Sync {
    /// Resolve boundaries ordered by descending score.
    async fn search(&self, request: BoundarySearchRequest) -> Result<Vec<ResolvedBoundary>, Error>;
}

/// Fixture implementation that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBoundarySearchQuery;

#[async_trait]
impl BoundarySearchQuery for FixtureBoundarySearchQuery {
    async fn search(&self, _request: BoundarySearchRequest) -> Result<Vec<ResolvedBoundary>, Error> {
        Ok(Vec::new())
    }
}
