use crate::models::{BoundingBox, PoiId, PointOfInterest};

/// Deterministic stand-in POI sample for a bounding box
///
/// Points sit at the cell centres of a near-square grid over `bbox`, so the
/// same request always produces the same figures. Seven in ten are bus stops,
/// the rest billboards.
pub fn sample_pois(bbox: &BoundingBox, n: usize) -> Vec<PointOfInterest> {
    if n == 0 {
        return Vec::new();
    }

    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let lat_step = (bbox.max_lat - bbox.min_lat) / rows as f64;
    let lon_step = (bbox.max_lon - bbox.min_lon) / cols as f64;

    (0..n)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let lat = bbox.min_lat + (row as f64 + 0.5) * lat_step;
            let lon = bbox.min_lon + (col as f64 + 0.5) * lon_step;

            let poi = PointOfInterest::new(PoiId::Str(format!("syn-{}", i)), lat, lon)
                .with_tag("name", &format!("Ponto {}", i))
                .with_tag("addr:street", &format!("Rua {}", i % 20));

            if i % 10 < 7 {
                poi.with_tag("highway", "bus_stop")
            } else {
                poi.with_tag("advertising", "billboard")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::{within_region, PoiKind};

    #[test]
    fn test_sample_inside_bbox() {
        let bbox = BoundingBox::new(-23.75, -46.75, -23.60, -46.60);
        let pois = sample_pois(&bbox, 200);

        assert_eq!(pois.len(), 200);
        assert!(pois.iter().all(|p| within_region(p, &bbox)));
    }

    #[test]
    fn test_sample_mix_and_labels() {
        let bbox = BoundingBox::new(-23.75, -46.75, -23.60, -46.60);
        let pois = sample_pois(&bbox, 200);

        let bus_stops = pois.iter().filter(|p| PoiKind::of(p) == PoiKind::BusStop).count();
        assert_eq!(bus_stops, 140);
        assert_eq!(pois[21].display_label("?"), "Ponto 21, Rua 1");
        assert_eq!(pois[0].id, PoiId::Str("syn-0".to_string()));
    }

    #[test]
    fn test_sample_is_deterministic() {
        let bbox = BoundingBox::new(-23.55, -46.70, -23.45, -46.60);
        assert_eq!(sample_pois(&bbox, 37), sample_pois(&bbox, 37));
        assert!(sample_pois(&bbox, 0).is_empty());
    }
}
