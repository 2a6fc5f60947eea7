use crate::coord::PlaneCoordinate;
use crate::error::PagesError;
use proj::Proj;

/// Reprojects plane coordinates to geographic coordinates.
///
/// Implementations take EPSG:3067 (easting, northing) pairs and return
/// WGS84 (longitude, latitude) pairs in the same order. Injected into the
/// projector so tests can substitute a fake.
pub trait Reproject {
    fn to_geographic(&self, points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, PagesError>;

    /// Reprojects a single point.
    fn point_to_geographic<C: PlaneCoordinate>(&self, coord: &C) -> Result<(f64, f64), PagesError>
    where
        Self: Sized,
    {
        self.to_geographic(&[(coord.easting(), coord.northing())])?
            .into_iter()
            .next()
            .ok_or_else(|| PagesError::ProjectionError("empty result".to_string()))
    }
}

/// PROJ-backed EPSG:3067 to EPSG:4326 transform, created once and reused.
pub struct ProjReprojector {
    proj: Proj,
}

impl ProjReprojector {
    pub fn new() -> Result<Self, PagesError> {
        let proj = Proj::new_known_crs("EPSG:3067", "EPSG:4326", None)
            .map_err(|e| PagesError::ProjectionError(e.to_string()))?;
        Ok(Self { proj })
    }
}

impl std::fmt::Debug for ProjReprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjReprojector")
            .field("from", &"EPSG:3067")
            .field("to", &"EPSG:4326")
            .finish()
    }
}

impl Reproject for ProjReprojector {
    fn to_geographic(&self, points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, PagesError> {
        let mut batch = points.to_vec();
        self.proj
            .convert_array(&mut batch)
            .map_err(|e| PagesError::ProjectionError(e.to_string()))?;

        if let Some((lon, lat)) = batch.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(PagesError::ProjectionError(format!(
                "non-finite result ({lon}, {lat})"
            )));
        }
        Ok(batch)
    }
}
