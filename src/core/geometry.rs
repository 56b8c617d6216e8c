use crate::core::error::{CoverageError, Result};
use crate::models::{GeoPoi, PointOfInterest};
use geo::Point;

/// Output of [`pois_to_geo`]
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub points: Vec<GeoPoi>,
    /// Records dropped because `lat` or `lon` was missing
    pub skipped_missing: usize,
}

/// Reject latitudes outside [-90, 90], longitudes outside [-180, 180] and NaNs
#[inline]
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(CoverageError::InvalidCoordinate { lat, lon })
    }
}

/// Check a record's coordinates without converting it; records missing
/// `lat` or `lon` pass and are left for [`pois_to_geo`] to count
pub fn validate_poi(poi: &PointOfInterest) -> Result<()> {
    match (poi.lat, poi.lon) {
        (Some(lat), Some(lon)) => validate_coordinate(lat, lon),
        _ => Ok(()),
    }
}

/// WGS84 point for a coordinate pair. Note the order: x = lon, y = lat.
#[inline]
pub fn to_point(lat: f64, lon: f64) -> Result<Point<f64>> {
    validate_coordinate(lat, lon)?;
    Ok(Point::new(lon, lat))
}

/// Convert fetched records to point geometries
///
/// Records without coordinates are skipped and counted. An out-of-range
/// coordinate fails the whole batch.
pub fn pois_to_geo(pois: Vec<PointOfInterest>) -> Result<Conversion> {
    let mut conversion = Conversion {
        points: Vec::with_capacity(pois.len()),
        skipped_missing: 0,
    };

    for poi in pois {
        let (lat, lon) = match (poi.lat, poi.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                conversion.skipped_missing += 1;
                continue;
            }
        };

        let point = to_point(lat, lon)?;
        conversion.points.push(GeoPoi { poi, point });
    }

    if conversion.skipped_missing > 0 {
        tracing::debug!(
            "Skipped {} records without coordinates",
            conversion.skipped_missing
        );
    }

    Ok(conversion)
}

/// Back to `(lat, lon)` pairs, in input order
pub fn geo_to_lat_lon(points: &[GeoPoi]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.lat(), p.lon())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order() {
        let point = to_point(-23.55, -46.63).unwrap();
        assert_eq!(point.x(), -46.63);
        assert_eq!(point.y(), -23.55);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            to_point(91.0, 0.0),
            Err(CoverageError::InvalidCoordinate { lat: 91.0, lon: 0.0 })
        );
        assert!(to_point(0.0, -180.5).is_err());
        assert!(to_point(f64::NAN, 0.0).is_err());
        assert!(to_point(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_missing_coordinates_skipped_not_zeroed() {
        let mut missing_lon = PointOfInterest::new(2, -23.5, 0.0);
        missing_lon.lon = None;
        let pois = vec![PointOfInterest::new(1, -23.5, -46.6), missing_lon];

        let conversion = pois_to_geo(pois).unwrap();
        assert_eq!(conversion.points.len(), 1);
        assert_eq!(conversion.skipped_missing, 1);
        assert!(conversion.points.iter().all(|p| p.lon() != 0.0));
    }

    #[test]
    fn test_invalid_record_fails_batch() {
        let pois = vec![
            PointOfInterest::new(1, -23.5, -46.6),
            PointOfInterest::new(2, -123.5, -46.6),
        ];
        assert!(matches!(
            pois_to_geo(pois),
            Err(CoverageError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_validate_poi() {
        let mut missing = PointOfInterest::new(1, 999.0, 0.0);
        missing.lon = None;
        assert!(validate_poi(&missing).is_ok());
        assert!(validate_poi(&PointOfInterest::new(2, -23.5, -46.6)).is_ok());
        assert!(matches!(
            validate_poi(&PointOfInterest::new(3, f64::NAN, -46.6)),
            Err(CoverageError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let conversion = pois_to_geo(vec![]).unwrap();
        assert!(conversion.points.is_empty());
        assert_eq!(conversion.skipped_missing, 0);
    }
}
