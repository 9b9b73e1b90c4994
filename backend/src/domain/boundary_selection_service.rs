//! Boundary selection management.
//!
//! Writes for one city are serialised through a per-city async lock, so a
//! deactivate-then-write never interleaves with another writer for the same
//! city. Writes for different cities hold different locks and run
//! concurrently. Repositories make each replacement atomic on their side.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;

use crate::domain::boundary_geometry::GeometryResolver;
use crate::domain::ports::{
    BoundarySelectionCommand, BoundarySelectionQuery, BoundarySelectionRepository,
    BoundarySelectionRepositoryError, BoundarySource, SelectBoundaryRequest,
};
use crate::domain::{BoundarySelection, CityId, Error, ResolvedBoundary, UserId};

fn map_repository_error(error: BoundarySelectionRepositoryError) -> Error {
    match error {
        BoundarySelectionRepositoryError::Connection { message } => Error::service_unavailable(
            format!("boundary selection repository unavailable: {message}"),
        ),
        BoundarySelectionRepositoryError::Query { message } => {
            Error::internal(format!("boundary selection repository error: {message}"))
        }
    }
}

/// Lazily created async locks keyed by city.
#[derive(Default)]
struct CityLocks {
    locks: Mutex<HashMap<CityId, Arc<AsyncMutex<()>>>>,
}

impl CityLocks {
    async fn acquire(&self, city_id: &CityId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries only referenced by the map have no holder or waiter.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(city_id.clone()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Selection manager implementing the selection driving ports.
pub struct BoundarySelectionService<R, S> {
    repository: Arc<R>,
    resolver: GeometryResolver<S>,
    clock: Arc<dyn Clock>,
    city_locks: Arc<CityLocks>,
}

impl<R, S> Clone for BoundarySelectionService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            resolver: self.resolver.clone(),
            clock: Arc::clone(&self.clock),
            city_locks: Arc::clone(&self.city_locks),
        }
    }
}

impl<R, S> BoundarySelectionService<R, S>
where
    R: BoundarySelectionRepository,
    S: BoundarySource,
{
    pub fn new(repository: Arc<R>, source: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            resolver: GeometryResolver::new(source),
            clock,
            city_locks: Arc::new(CityLocks::default()),
        }
    }

    /// Make `boundary` the city's only active selection.
    ///
    /// Selecting the same boundary twice leaves exactly one active selection.
    pub async fn select(
        &self,
        city_id: CityId,
        boundary: ResolvedBoundary,
        selected_by: UserId,
    ) -> Result<BoundarySelection, Error> {
        let _guard = self.city_locks.acquire(&city_id).await;
        let selection = BoundarySelection::new(city_id, boundary, self.clock.utc(), selected_by);
        self.repository
            .replace_active(&selection)
            .await
            .map_err(map_repository_error)?;
        info!(
            city_id = %selection.city_id(),
            composite_id = %selection.composite_id(),
            selected_by = %selection.selected_by(),
            "boundary selected"
        );
        Ok(selection)
    }

    /// Active selection for the city, if any.
    pub async fn get_selection(&self, city_id: &CityId) -> Result<Option<BoundarySelection>, Error> {
        self.repository
            .find_active(city_id)
            .await
            .map_err(map_repository_error)
    }

    /// Drop the city's override so the authoritative boundary applies again.
    pub async fn restore_default(&self, city_id: &CityId) -> Result<bool, Error> {
        let _guard = self.city_locks.acquire(city_id).await;
        let cleared = self
            .repository
            .deactivate(city_id)
            .await
            .map_err(map_repository_error)?;
        info!(city_id = %city_id, cleared, "boundary selection restored to default");
        Ok(cleared)
    }
}

#[async_trait]
impl<R, S> BoundarySelectionCommand for BoundarySelectionService<R, S>
where
    R: BoundarySelectionRepository,
    S: BoundarySource,
{
    async fn select_boundary(&self, request: SelectBoundaryRequest) -> Result<BoundarySelection, Error> {
        let SelectBoundaryRequest {
            city_id,
            composite_id,
            selected_by,
        } = request;
        let boundary = self.resolver.resolve_boundary(composite_id).await?;
        self.select(city_id, boundary, selected_by).await
    }

    async fn restore_default(&self, city_id: CityId) -> Result<bool, Error> {
        BoundarySelectionService::restore_default(self, &city_id).await
    }
}

#[async_trait]
impl<R, S> BoundarySelectionQuery for BoundarySelectionService<R, S>
where
    R: BoundarySelectionRepository,
    S: BoundarySource,
{
    async fn get_selection(&self, city_id: CityId) -> Result<Option<BoundarySelection>, Error> {
        BoundarySelectionService::get_selection(self, &city_id).await
    }
}

#[cfg(test)]
#[path = "boundary_selection_service_tests.rs"]
mod tests;
