//! Per-city boundary selection.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoundaryValidationError, CompositeId, ResolvedBoundary};
use crate::domain::UserId;

/// Longest accepted city identifier.
pub const CITY_ID_MAX: usize = 128;

/// Identifier of a city owned by the partner platform.
///
/// Opaque to this service; validated only for shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CityId(String);

impl CityId {
    pub fn new(id: impl Into<String>) -> Result<Self, BoundaryValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BoundaryValidationError::EmptyCityId);
        }
        if id.trim() != id || id.chars().count() > CITY_ID_MAX || id.contains('/') {
            return Err(BoundaryValidationError::InvalidCityId { max: CITY_ID_MAX });
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CityId {
    type Error = BoundaryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CityId> for String {
    fn from(value: CityId) -> Self {
        value.0
    }
}

/// The boundary a user chose for a city.
///
/// At most one selection per city is active at any time. The resolved
/// boundary snapshot is kept so the stored geometry can be downloaded without
/// another upstream round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySelection {
    city_id: CityId,
    selected_at: DateTime<Utc>,
    selected_by: UserId,
    boundary: ResolvedBoundary,
}

impl BoundarySelection {
    #[must_use]
    pub fn new(
        city_id: CityId,
        boundary: ResolvedBoundary,
        selected_at: DateTime<Utc>,
        selected_by: UserId,
    ) -> Self {
        Self {
            city_id,
            selected_at,
            selected_by,
            boundary,
        }
    }

    #[must_use]
    pub fn city_id(&self) -> &CityId {
        &self.city_id
    }

    #[must_use]
    pub fn composite_id(&self) -> CompositeId {
        self.boundary.composite_id()
    }

    #[must_use]
    pub fn selected_at(&self) -> DateTime<Utc> {
        self.selected_at
    }

    #[must_use]
    pub fn selected_by(&self) -> &UserId {
        &self.selected_by
    }

    #[must_use]
    pub fn boundary(&self) -> &ResolvedBoundary {
        &self.boundary
    }
}
