//! Closed-ring polygon geometry.
//!
//! Coordinates are `[longitude, latitude]` pairs in degrees. A [`Ring`] can
//! only exist when it is closed and has at least three distinct points, so a
//! [`BoundaryGeometry`] is never emitted malformed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::BoundaryValidationError;

/// Minimum number of distinct points in a ring.
pub const MIN_DISTINCT_RING_POINTS: usize = 3;

/// One `[longitude, latitude]` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    fn is_finite(self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    fn bit_key(self) -> (u64, u64) {
        (self.longitude.to_bits(), self.latitude.to_bits())
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.longitude, value.latitude]
    }
}

/// Closed linear ring.
///
/// # Examples
/// ```
/// use city_boundaries::domain::{Coordinate, Ring};
///
/// let ring = Ring::close(vec![
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(1.0, 0.0),
///     Coordinate::new(1.0, 1.0),
/// ])
/// .expect("three distinct points");
/// assert_eq!(ring.points().first(), ring.points().last());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Ring(Vec<Coordinate>);

impl Ring {
    /// Validate an already closed sequence of points.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, BoundaryValidationError> {
        if points.iter().any(|point| !point.is_finite()) {
            return Err(BoundaryValidationError::NonFiniteCoordinate);
        }
        if points.first() != points.last() {
            return Err(BoundaryValidationError::OpenRing);
        }
        let distinct = points
            .iter()
            .map(|point| point.bit_key())
            .collect::<HashSet<_>>()
            .len();
        if distinct < MIN_DISTINCT_RING_POINTS {
            return Err(BoundaryValidationError::DegenerateRing {
                distinct_points: distinct,
            });
        }
        Ok(Self(points))
    }

    /// Close the sequence by repeating its first point when needed, then
    /// validate it.
    pub fn close(mut points: Vec<Coordinate>) -> Result<Self, BoundaryValidationError> {
        match (points.first().copied(), points.last().copied()) {
            (Some(first), Some(last)) if first != last => points.push(first),
            _ => {}
        }
        Self::new(points)
    }

    /// Points including the repeated closing point.
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        self.0.as_slice()
    }
}

impl TryFrom<Vec<Coordinate>> for Ring {
    type Error = BoundaryValidationError;

    fn try_from(value: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ring> for Vec<Coordinate> {
    fn from(value: Ring) -> Self {
        value.0
    }
}

/// Assembled boundary outline.
///
/// Serialises in the GeoJSON geometry shape: a polygon is a list holding one
/// outer ring, a multipolygon a list of such polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryDto", into = "GeometryDto")]
pub enum BoundaryGeometry {
    Polygon(Ring),
    MultiPolygon(Vec<Ring>),
}

impl BoundaryGeometry {
    /// One ring yields a polygon, several a multipolygon.
    pub fn from_rings(mut rings: Vec<Ring>) -> Result<Self, BoundaryValidationError> {
        match rings.len() {
            0 => Err(BoundaryValidationError::EmptyGeometry),
            1 => Ok(Self::Polygon(rings.remove(0))),
            _ => Ok(Self::MultiPolygon(rings)),
        }
    }

    /// Outer rings in assembly order.
    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        match self {
            Self::Polygon(ring) => std::slice::from_ref(ring),
            Self::MultiPolygon(rings) => rings.as_slice(),
        }
    }

    /// GeoJSON geometry type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeometryDto {
    Polygon(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
}

fn outer_ring(mut polygon: Vec<Vec<Coordinate>>) -> Result<Ring, BoundaryValidationError> {
    if polygon.is_empty() {
        return Err(BoundaryValidationError::EmptyGeometry);
    }
    Ring::new(polygon.swap_remove(0))
}

impl TryFrom<GeometryDto> for BoundaryGeometry {
    type Error = BoundaryValidationError;

    fn try_from(value: GeometryDto) -> Result<Self, Self::Error> {
        match value {
            GeometryDto::Polygon(polygon) => outer_ring(polygon).map(Self::Polygon),
            GeometryDto::MultiPolygon(polygons) => {
                let rings = polygons
                    .into_iter()
                    .map(outer_ring)
                    .collect::<Result<Vec<_>, _>>()?;
                if rings.is_empty() {
                    return Err(BoundaryValidationError::EmptyGeometry);
                }
                Ok(Self::MultiPolygon(rings))
            }
        }
    }
}

impl From<BoundaryGeometry> for GeometryDto {
    fn from(value: BoundaryGeometry) -> Self {
        match value {
            BoundaryGeometry::Polygon(ring) => Self::Polygon(vec![ring.into()]),
            BoundaryGeometry::MultiPolygon(rings) => {
                Self::MultiPolygon(rings.into_iter().map(|ring| vec![ring.into()]).collect())
            }
        }
    }
}
