use crate::models::BoundingBox;

/// Mean Earth radius in kilometers
const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle ground distance in kilometers
///
/// Ground truth for checking how far Web Mercator buffers actually reach.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let half_dphi = (lat2 - lat1).to_radians() / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;

    let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);

    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Square search area of `radius_km` each way around a clicked map position
///
/// One degree of latitude is taken as 111 km; longitude degrees shrink with
/// `cos(lat)`. Latitudes are clamped to the valid range.
pub fn search_bbox(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let lon_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos().abs());

    BoundingBox {
        min_lat: (lat - lat_delta).max(-90.0),
        max_lat: (lat + lat_delta).min(90.0),
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    (bbox.min_lat..=bbox.max_lat).contains(&lat) && (bbox.min_lon..=bbox.max_lon).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Praça da Sé to MASP on Avenida Paulista
        let distance = haversine_distance(-23.5503, -46.6339, -23.5614, -46.6559);
        assert!((distance - 2.5).abs() < 0.5, "Distance should be ~2.5km, got {}", distance);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = search_bbox(-23.55, -46.63, 1.11);

        assert!(bbox.min_lat < -23.55);
        assert!(bbox.max_lat > -23.55);
        assert!(bbox.min_lon < -46.63);
        assert!(bbox.max_lon > -46.63);

        // 1.11 km each way is 0.01 degrees of latitude
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.02).abs() < 1e-9, "Lat span should be 0.02 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = search_bbox(-23.55, -46.63, 10.0);

        assert!(is_within_bounding_box(-23.55, -46.63, &bbox));
        assert!(is_within_bounding_box(-23.56, -46.62, &bbox));
        assert!(!is_within_bounding_box(-22.90, -43.17, &bbox));
    }
}
