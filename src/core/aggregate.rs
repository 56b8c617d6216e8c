use crate::core::error::Result;
use crate::models::{Buffer, BufferPopulation, EstimationMethod, PopulationZone, Region};
use geo::Intersects;

/// Population attributed to each buffer
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub per_buffer: Vec<BufferPopulation>,
    pub method: EstimationMethod,
}

impl Aggregation {
    pub fn total_population(&self) -> f64 {
        self.per_buffer.iter().map(|b| b.population).sum()
    }

    pub fn total_area_km2(&self) -> f64 {
        self.per_buffer.iter().map(|b| b.area_km2).sum()
    }
}

/// Share of the region's population reached, in percent, capped at 100
///
/// Overlapping buffers can attribute more people than the region holds; the
/// cap keeps the figure meaningful. A region with no population has no reach.
#[inline]
pub fn reach_pct(population_covered: f64, region_population: u64) -> f64 {
    if region_population == 0 {
        return 0.0;
    }
    (100.0 * population_covered / region_population as f64).clamp(0.0, 100.0)
}

/// Sum population per buffer
///
/// With partition zones, every zone intersecting a buffer contributes its
/// full population. Without zones (or with an empty set) the buffer's planar
/// area is multiplied by the region's uniform density.
pub fn aggregate_population(
    buffers: &[Buffer],
    zones: Option<&[PopulationZone]>,
    region: &Region,
) -> Result<Aggregation> {
    region.validate()?;

    match zones {
        Some(zones) if !zones.is_empty() => Ok(Aggregation {
            per_buffer: buffers.iter().map(|b| sum_intersecting(b, zones)).collect(),
            method: EstimationMethod::Partition,
        }),
        _ => {
            let density = region.density();
            Ok(Aggregation {
                per_buffer: buffers
                    .iter()
                    .map(|b| BufferPopulation {
                        poi_id: b.poi_id.clone(),
                        area_km2: b.area_km2(),
                        population: b.area_km2() * density,
                    })
                    .collect(),
                method: EstimationMethod::UniformDensity,
            })
        }
    }
}

fn sum_intersecting(buffer: &Buffer, zones: &[PopulationZone]) -> BufferPopulation {
    // f64: large u64 populations overflow when summed
    let population: f64 = zones
        .iter()
        .filter(|z| z.polygon.intersects(&buffer.polygon))
        .map(|z| z.population as f64)
        .sum();

    BufferPopulation {
        poi_id: buffer.poi_id.clone(),
        area_km2: buffer.area_km2(),
        population,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::create_buffer;
    use crate::core::geometry::to_point;
    use crate::models::{BoundingBox, GeoPoi, PointOfInterest};
    use geo::{polygon, Polygon};

    fn region() -> Region {
        Region::new(
            "Zona Sul",
            2_800_000,
            240.0,
            BoundingBox::new(-23.75, -46.75, -23.60, -46.60),
        )
    }

    fn buffer_at(id: i64, lat: f64, lon: f64) -> Buffer {
        let p = GeoPoi {
            poi: PointOfInterest::new(id, lat, lon),
            point: to_point(lat, lon).unwrap(),
        };
        create_buffer(&p, 150.0, 64).unwrap()
    }

    fn square(min_lon: f64, min_lat: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: min_lon, y: min_lat),
            (x: min_lon + size, y: min_lat),
            (x: min_lon + size, y: min_lat + size),
            (x: min_lon, y: min_lat + size),
        ]
    }

    #[test]
    fn test_uniform_density_fallback() {
        let buffers = vec![buffer_at(1, -23.65, -46.70)];
        let agg = aggregate_population(&buffers, None, &region()).unwrap();

        assert_eq!(agg.method, EstimationMethod::UniformDensity);
        // π · 0.15² km² · 11,666.7 /km²
        assert!((agg.total_population() - 824.67).abs() < 1.0);
    }

    #[test]
    fn test_partition_sums_intersecting_zones() {
        let zones = vec![
            PopulationZone {
                name: Some("tract-a".into()),
                polygon: square(-46.71, -23.66, 0.02),
                population: 1200,
            },
            PopulationZone {
                name: Some("tract-b".into()),
                polygon: square(-46.70, -23.65, 0.005),
                population: 300,
            },
            PopulationZone {
                name: Some("far".into()),
                polygon: square(-46.50, -23.50, 0.01),
                population: 9999,
            },
        ];
        let buffers = vec![buffer_at(1, -23.65, -46.70), buffer_at(2, -23.70, -46.65)];

        let agg = aggregate_population(&buffers, Some(&zones), &region()).unwrap();
        assert_eq!(agg.method, EstimationMethod::Partition);
        assert_eq!(agg.per_buffer[0].population, 1500.0);
        // unmatched buffer gets zero, not a missing value
        assert_eq!(agg.per_buffer[1].population, 0.0);
    }

    #[test]
    fn test_empty_partition_falls_back() {
        let buffers = vec![buffer_at(1, -23.65, -46.70)];
        let agg = aggregate_population(&buffers, Some(&[][..]), &region()).unwrap();
        assert_eq!(agg.method, EstimationMethod::UniformDensity);
    }

    #[test]
    fn test_huge_zone_populations_do_not_overflow() {
        let half = u64::MAX / 2 + 1;
        let zones = vec![
            PopulationZone {
                name: Some("a".into()),
                polygon: square(-46.71, -23.66, 0.02),
                population: half,
            },
            PopulationZone {
                name: Some("b".into()),
                polygon: square(-46.71, -23.66, 0.02),
                population: half,
            },
        ];
        let buffers = vec![buffer_at(1, -23.65, -46.70)];

        let agg = aggregate_population(&buffers, Some(zones.as_slice()), &region()).unwrap();
        let total = agg.total_population();
        assert!(total.is_finite());
        assert!((total - 2.0 * half as f64).abs() / total < 1e-12);
    }

    #[test]
    fn test_reach_capped() {
        assert_eq!(reach_pct(5_000_000.0, 2_800_000), 100.0);
        assert_eq!(reach_pct(0.0, 2_800_000), 0.0);
        assert_eq!(reach_pct(100.0, 0), 0.0);
        assert!((reach_pct(28_000.0, 2_800_000) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_buffers() {
        let agg = aggregate_population(&[], None, &region()).unwrap();
        assert!(agg.per_buffer.is_empty());
        assert_eq!(agg.total_population(), 0.0);
    }
}
