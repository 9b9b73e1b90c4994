//! Element identity: kind discriminator and composite identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BoundaryValidationError;

/// Primitive element kinds that can carry a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// An ordered line of nodes.
    Way,
    /// A composite of member ways and nodes with roles.
    Relation,
}

impl ElementKind {
    /// Lower-case name used in queries and composite identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = BoundaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            other => Err(BoundaryValidationError::UnsupportedElementKind {
                kind: other.to_owned(),
            }),
        }
    }
}

/// Stable reference to one element, rendered as `"<kind>/<id>"`.
///
/// # Examples
/// ```
/// use city_boundaries::domain::{CompositeId, ElementKind};
///
/// let id: CompositeId = "relation/161950".parse().expect("valid composite id");
/// assert_eq!(id.kind(), ElementKind::Relation);
/// assert_eq!(id.external_id(), 161_950);
/// assert_eq!(id.to_string(), "relation/161950");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeId {
    kind: ElementKind,
    external_id: i64,
}

impl CompositeId {
    /// Pair a kind with an upstream identifier.
    #[must_use]
    pub const fn new(kind: ElementKind, external_id: i64) -> Self {
        Self { kind, external_id }
    }

    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub const fn external_id(&self) -> i64 {
        self.external_id
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.external_id)
    }
}

impl FromStr for CompositeId {
    type Err = BoundaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoundaryValidationError::InvalidCompositeId {
            value: s.to_owned(),
        };
        let (kind, id) = s.split_once('/').ok_or_else(invalid)?;
        let kind = kind.parse::<ElementKind>().map_err(|_| invalid())?;
        let external_id = id.parse::<i64>().map_err(|_| invalid())?;
        if external_id <= 0 {
            return Err(invalid());
        }
        Ok(Self::new(kind, external_id))
    }
}

impl TryFrom<String> for CompositeId {
    type Error = BoundaryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompositeId> for String {
    fn from(value: CompositeId) -> Self {
        value.to_string()
    }
}
