use crate::core::error::{CoverageError, Result};
use crate::core::projection::{polygon_from_web_mercator, to_web_mercator};
use crate::models::{Buffer, GeoPoi};
use geo::{Area, Coord, LineString, Polygon};
use std::f64::consts::PI;

/// Fewest vertices accepted for the circle approximation
pub const MIN_SEGMENTS: usize = 16;

pub const DEFAULT_SEGMENTS: usize = 64;

/// Buffers kept for display plus how many were left out
#[derive(Debug, Clone, Default)]
pub struct DisplayBuffers {
    pub buffers: Vec<Buffer>,
    pub truncated: usize,
}

#[inline]
pub fn validate_radius(radius_m: f64) -> Result<()> {
    if radius_m.is_finite() && radius_m > 0.0 {
        Ok(())
    } else {
        Err(CoverageError::InvalidRadius(radius_m))
    }
}

#[inline]
fn validate_segments(segments: usize) -> Result<()> {
    if segments >= MIN_SEGMENTS {
        Ok(())
    } else {
        Err(CoverageError::InvalidSegments(segments))
    }
}

/// Circumradius of a regular n-gon with the same area as a circle of `radius`
///
/// An inscribed n-gon loses `1 - sin(2π/n)·n/2π` of the circle's area (2.5 %
/// at 16 vertices). Stretching the vertices out by this factor keeps the
/// planar area at π·r².
#[inline]
fn area_equivalent_radius(radius: f64, segments: usize) -> f64 {
    let n = segments as f64;
    radius * (2.0 * PI / (n * (2.0 * PI / n).sin())).sqrt()
}

/// Disk around one point, built in Web Mercator and returned in WGS84
pub fn create_buffer(point: &GeoPoi, radius_m: f64, segments: usize) -> Result<Buffer> {
    validate_radius(radius_m)?;
    validate_segments(segments)?;

    let centre = to_web_mercator(point.point)?;
    let r = area_equivalent_radius(radius_m, segments);

    let ring: Vec<Coord<f64>> = (0..segments)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / segments as f64;
            Coord {
                x: centre.x() + r * theta.cos(),
                y: centre.y() + r * theta.sin(),
            }
        })
        .collect();

    // Polygon::new closes the ring
    let metric = Polygon::new(LineString::from(ring), vec![]);
    let planar_area_m2 = metric.unsigned_area();

    Ok(Buffer {
        poi_id: point.poi.id.clone(),
        radius_m,
        polygon: polygon_from_web_mercator(&metric),
        planar_area_m2,
    })
}

/// One buffer per input point, in input order
pub fn create_buffers(points: &[GeoPoi], radius_m: f64, segments: usize) -> Result<Vec<Buffer>> {
    validate_radius(radius_m)?;
    validate_segments(segments)?;

    points
        .iter()
        .map(|p| create_buffer(p, radius_m, segments))
        .collect()
}

/// Buffers for map display, capped at the first `cap` points
pub fn display_buffers(
    points: &[GeoPoi],
    radius_m: f64,
    segments: usize,
    cap: usize,
) -> Result<DisplayBuffers> {
    let kept = points.len().min(cap);
    let buffers = create_buffers(&points[..kept], radius_m, segments)?;
    let truncated = points.len() - kept;

    if truncated > 0 {
        tracing::debug!("Display buffers capped at {} ({} left out)", cap, truncated);
    }

    Ok(DisplayBuffers { buffers, truncated })
}
