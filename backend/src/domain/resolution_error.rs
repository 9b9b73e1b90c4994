//! Failure taxonomy of the boundary resolution engine.
//!
//! Request-level variants surface to callers. Candidate-level variants
//! (`GeometryResolutionFailed`, `MalformedGeometry`) are absorbed by the
//! search and only decide which candidates appear in the result.

use serde_json::json;
use thiserror::Error;

use super::{BoundaryValidationError, CompositeId, Error, UnknownCountry};

/// Failure while searching for or resolving a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryResolutionError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("unknown country: {name}")]
    UnknownCountry { name: String },
    #[error("boundary source unavailable: {message}")]
    UpstreamUnavailable { message: String },
    #[error("geometry for {id} could not be resolved: {message}")]
    GeometryResolutionFailed { id: CompositeId, message: String },
    #[error("geometry for {id} is malformed: {message}")]
    MalformedGeometry { id: CompositeId, message: String },
}

impl BoundaryResolutionError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn geometry_resolution_failed(id: CompositeId, message: impl Into<String>) -> Self {
        Self::GeometryResolutionFailed {
            id,
            message: message.into(),
        }
    }

    pub fn malformed_geometry(id: CompositeId, message: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            id,
            message: message.into(),
        }
    }

    /// Whether this failure only affects one candidate.
    #[must_use]
    pub fn is_candidate_scoped(&self) -> bool {
        matches!(
            self,
            Self::GeometryResolutionFailed { .. } | Self::MalformedGeometry { .. }
        )
    }
}

impl From<BoundaryValidationError> for BoundaryResolutionError {
    fn from(value: BoundaryValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

impl From<UnknownCountry> for BoundaryResolutionError {
    fn from(value: UnknownCountry) -> Self {
        Self::UnknownCountry { name: value.name }
    }
}

impl From<BoundaryValidationError> for Error {
    fn from(value: BoundaryValidationError) -> Self {
        Self::from(BoundaryResolutionError::from(value))
    }
}

impl From<BoundaryResolutionError> for Error {
    fn from(value: BoundaryResolutionError) -> Self {
        match value {
            BoundaryResolutionError::InvalidRequest { message } => Self::invalid_request(message),
            BoundaryResolutionError::UnknownCountry { name } => Self::unknown_country(format!(
                "unknown country: {name}; supply an explicit countryCode"
            ))
            .with_details(json!({ "country": name })),
            BoundaryResolutionError::UpstreamUnavailable { message } => {
                Self::upstream_unavailable(message)
            }
            BoundaryResolutionError::GeometryResolutionFailed { id, message }
            | BoundaryResolutionError::MalformedGeometry { id, message } => {
                Self::invalid_request(format!("boundary {id} has no usable geometry: {message}"))
                    .with_details(json!({ "compositeId": id.to_string() }))
            }
        }
    }
}
