//! Driving ports for boundary selection mutations and reads.

use async_trait::async_trait;

use crate::domain::{BoundarySelection, CityId, CompositeId, Error, UserId};

/// Request to pin an element's boundary to a city.
///
/// Only the element reference is accepted; geometry is resolved server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectBoundaryRequest {
    pub city_id: CityId,
    pub composite_id: CompositeId,
    pub selected_by: UserId,
}

/// Driving port for selection writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundarySelectionCommand: Send + Sync {
    /// Resolve the element and make it the city's only active selection.
    async fn select_boundary(&self, request: SelectBoundaryRequest) -> Result<BoundarySelection, Error>;

    /// Clear the city's selection. Returns whether one was active.
    async fn restore_default(&self, city_id: CityId) -> Result<bool, Error>;
}

/// Driving port for selection reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundarySelectionQuery: Send + Sync {
    /// Active selection for the city, if any.
    async fn get_selection(&self, city_id: CityId) -> Result<Option<BoundarySelection>, Error>;
}

/// Fixture command with nothing to select.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBoundarySelectionCommand;

#[async_trait]
impl BoundarySelectionCommand for FixtureBoundarySelectionCommand {
    async fn select_boundary(&self, request: SelectBoundaryRequest) -> Result<BoundarySelection, Error> {
        Err(Error::not_found(format!(
            "boundary {} is not available",
            request.composite_id
        )))
    }

    async fn restore_default(&self, _city_id: CityId) -> Result<bool, Error> {
        Ok(false)
    }
}

/// Fixture query with no selections.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBoundarySelectionQuery;

#[async_trait]
impl BoundarySelectionQuery for FixtureBoundarySelectionQuery {
    async fn get_selection(&self, _city_id: CityId) -> Result<Option<BoundarySelection>, Error> {
        Ok(None)
    }
}
