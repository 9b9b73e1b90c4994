//! Driven port for persisting per-city boundary selections.
//!
//! Implementations must make `replace_active` atomic: the previous active
//! selection is deactivated and the new one written as one unit, leaving at
//! most one active selection per city.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{BoundarySelection, CityId};

define_port_error! {
    /// Errors raised by selection repositories.
    pub enum BoundarySelectionRepositoryError {
        /// Storage is unreachable.
        Connection { message: String } =>
            "boundary selection repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "boundary selection repository query failed: {message}",
    }
}

/// Storage contract for boundary selections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundarySelectionRepository: Send + Sync {
    /// Deactivate any active selection for the city and store `selection` as
    /// the active one.
    async fn replace_active(
        &self,
        selection: &BoundarySelection,
    ) -> Result<(), BoundarySelectionRepositoryError>;

    /// Active selection for the city, if any.
    async fn find_active(
        &self,
        city_id: &CityId,
    ) -> Result<Option<BoundarySelection>, BoundarySelectionRepositoryError>;

    /// Deactivate the active selection. Returns whether one existed.
    async fn deactivate(&self, city_id: &CityId) -> Result<bool, BoundarySelectionRepositoryError>;
}
