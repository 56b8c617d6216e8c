//! Spherical Web Mercator (EPSG:3857) ↔ WGS84 (EPSG:4326)
//!
//! Buffers are grown in Web Mercator metres. The projection stretches
//! lengths by `1 / cos(lat)`, so a disk of r projected metres covers a
//! ground radius of about `r * cos(lat)`. At São Paulo (~23.5° S) that is
//! ~8 % shorter, or ~16 % less ground area. This is a known approximation
//! and fine for city-scale display.

use crate::core::error::{CoverageError, Result};
use geo::{Coord, MapCoords, Point, Polygon};
use std::f64::consts::FRAC_PI_4;

/// WGS84 semi-major axis, used as the sphere radius by EPSG:3857
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the Web Mercator square ends
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Project a WGS84 point (x = lon, y = lat) into Web Mercator metres
pub fn to_web_mercator(point: Point<f64>) -> Result<Point<f64>> {
    let (lon, lat) = (point.x(), point.y());
    if !lat.is_finite() || !lon.is_finite() || lat.abs() > MAX_MERCATOR_LAT || lon.abs() > 180.0 {
        return Err(CoverageError::InvalidCoordinate { lat, lon });
    }

    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok(Point::new(x, y))
}

/// Inverse of [`to_web_mercator`]
pub fn from_web_mercator(point: Point<f64>) -> Point<f64> {
    Point::from(coord_from_web_mercator(point.0))
}

#[inline]
fn coord_from_web_mercator(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Coord { x: lon, y: lat }
}

/// Reproject a Web Mercator polygon back to WGS84
pub fn polygon_from_web_mercator(polygon: &Polygon<f64>) -> Polygon<f64> {
    polygon.map_coords(coord_from_web_mercator)
}

/// Linear scale factor of Web Mercator at a latitude (projected / ground)
#[inline]
pub fn scale_factor(lat: f64) -> f64 {
    1.0 / lat.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_origin() {
        let p = to_web_mercator(Point::new(0.0, 0.0)).unwrap();
        assert!(p.x().abs() < 1e-9);
        assert!(p.y().abs() < 1e-9);
    }

    #[test]
    fn test_known_value_sao_paulo() {
        // Praça da Sé
        let p = to_web_mercator(Point::new(-46.6339, -23.5503)).unwrap();
        assert!((p.x() - -5_191_262.0).abs() < 1.0, "x = {}", p.x());
        assert!((p.y() - -2_698_705.2).abs() < 1.0, "y = {}", p.y());
    }

    #[test]
    fn test_round_trip_within_epsilon() {
        for &(lon, lat) in &[(-46.63, -23.55), (0.0, 0.0), (179.9, 80.0), (-120.5, 45.25)] {
            let back = from_web_mercator(to_web_mercator(Point::new(lon, lat)).unwrap());
            assert!((back.x() - lon).abs() < 1e-6);
            assert!((back.y() - lat).abs() < 1e-6);
        }
    }

    #[test]
    fn test_poles_rejected() {
        assert!(matches!(
            to_web_mercator(Point::new(0.0, 89.0)),
            Err(CoverageError::InvalidCoordinate { .. })
        ));
        assert!(to_web_mercator(Point::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_scale_factor_at_sao_paulo() {
        let k = scale_factor(-23.55);
        assert!((k - 1.0909).abs() < 1e-3);
        assert_eq!(scale_factor(0.0), 1.0);
    }
}
