use crate::error::PagesError;
use geo_types::{Coord, LineString, Polygon};

/// Closed ring of a plane rectangle.
///
/// Corners are always ordered bottom-left, bottom-right, top-right, top-left,
/// with the bottom-left corner repeated to close the ring.
pub fn plane_ring(origin: Coord<i64>, extent: Coord<i64>) -> [(f64, f64); 5] {
    let e = origin.x as f64;
    let n = origin.y as f64;
    let scale_e = extent.x as f64;
    let scale_n = extent.y as f64;

    [
        (e, n),
        (e + scale_e, n),
        (e + scale_e, n + scale_n),
        (e, n + scale_n),
        (e, n),
    ]
}

/// Builds a polygon from a closed ring of (longitude, latitude) pairs.
pub fn geographic_polygon(ring: Vec<(f64, f64)>) -> Result<Polygon<f64>, PagesError> {
    if ring.len() < 4 {
        return Err(PagesError::ProjectionError(format!(
            "ring has {} points, expected at least 4",
            ring.len()
        )));
    }
    if let Some((lon, lat)) = ring.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(PagesError::ProjectionError(format!(
            "non-finite coordinate ({lon}, {lat})"
        )));
    }

    Ok(Polygon::new(LineString::from(ring), vec![]))
}
