//! Approximate planar area of boundary outlines.
//!
//! Areas are computed in square degrees with the shoelace formula and scaled
//! by a fixed factor of `KM_PER_DEGREE²`. This is not a geodesic area: it
//! overstates areas away from the equator and only serves as a consistent
//! ranking and display signal. Bounding boxes use the same factor.

use crate::domain::{BoundaryGeometry, BoundingBox, Ring};

/// Kilometres spanned by one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Square kilometres per square degree.
pub const SQ_KM_PER_SQ_DEGREE: f64 = KM_PER_DEGREE * KM_PER_DEGREE;

/// Estimate the area of an assembled geometry in square kilometres.
///
/// Multipolygons sum the areas of their rings.
///
/// # Examples
/// ```
/// use city_boundaries::domain::{BoundaryGeometry, Coordinate, Ring, estimate_area_sq_km};
///
/// let ring = Ring::close(vec![
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(1.0, 0.0),
///     Coordinate::new(1.0, 1.0),
///     Coordinate::new(0.0, 1.0),
/// ])
/// .expect("valid ring");
/// let area = estimate_area_sq_km(&BoundaryGeometry::Polygon(ring));
/// assert!((area - 111.32 * 111.32).abs() < 1e-6);
/// ```
#[must_use]
pub fn estimate_area_sq_km(geometry: &BoundaryGeometry) -> f64 {
    geometry.rings().iter().map(ring_area_sq_km).sum()
}

/// Estimate the area of one ring in square kilometres.
#[must_use]
pub fn ring_area_sq_km(ring: &Ring) -> f64 {
    let twice_area: f64 = ring
        .points()
        .windows(2)
        .map(|pair| match pair {
            [a, b] => a.longitude * b.latitude - b.longitude * a.latitude,
            _ => 0.0,
        })
        .sum();
    (twice_area / 2.0).abs() * SQ_KM_PER_SQ_DEGREE
}

/// Estimate the area covered by a bounding box in square kilometres.
#[must_use]
pub fn bounding_box_area_sq_km(bounding_box: &BoundingBox) -> f64 {
    let width = (bounding_box.max_lon - bounding_box.min_lon).max(0.0);
    let height = (bounding_box.max_lat - bounding_box.min_lat).max(0.0);
    width * height * SQ_KM_PER_SQ_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use rstest::rstest;

    fn square(origin: f64, side: f64) -> Ring {
        Ring::close(vec![
            Coordinate::new(origin, origin),
            Coordinate::new(origin + side, origin),
            Coordinate::new(origin + side, origin + side),
            Coordinate::new(origin, origin + side),
        ])
        .expect("square is a valid ring")
    }

    #[rstest]
    fn polygon_area_ignores_winding_direction() {
        let clockwise = Ring::close(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.5),
            Coordinate::new(0.5, 0.5),
            Coordinate::new(0.5, 0.0),
        ])
        .expect("valid ring");
        let counter = square(0.0, 0.5);

        let a = ring_area_sq_km(&clockwise);
        let b = ring_area_sq_km(&counter);
        assert!((a - b).abs() < 1e-9);
        assert!((a - 0.25 * SQ_KM_PER_SQ_DEGREE).abs() < 1e-6);
    }

    #[rstest]
    fn multipolygon_sums_ring_areas() {
        let geometry =
            BoundaryGeometry::MultiPolygon(vec![square(0.0, 0.1), square(10.0, 0.2)]);
        let expected = (0.01 + 0.04) * SQ_KM_PER_SQ_DEGREE;
        assert!((estimate_area_sq_km(&geometry) - expected).abs() < 1e-6);
    }

    #[rstest]
    #[case(BoundingBox { min_lat: 39.7, min_lon: -89.8, max_lat: 39.9, max_lon: -89.5 }, 0.06)]
    #[case(BoundingBox { min_lat: 1.0, min_lon: 1.0, max_lat: 1.0, max_lon: 1.0 }, 0.0)]
    #[case(BoundingBox { min_lat: 2.0, min_lon: 2.0, max_lat: 1.0, max_lon: 1.0 }, 0.0)]
    fn bounding_box_area_scales_degree_extent(#[case] bbox: BoundingBox, #[case] sq_degrees: f64) {
        let area = bounding_box_area_sq_km(&bbox);
        assert!((area - sq_degrees * SQ_KM_PER_SQ_DEGREE).abs() < 1e-6);
        assert!(area >= 0.0);
    }
}
