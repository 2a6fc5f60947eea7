mod tm35_transformations;

pub use tm35_transformations::{ProjReprojector, Reproject};

use geo_types::{Coord, Point};

/// Trait for types that can provide an EPSG:3067 plane position.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and
/// `geo_types::Coord<f64>`, so lookups accept whichever the caller holds.
pub trait PlaneCoordinate {
    fn easting(&self) -> f64;
    fn northing(&self) -> f64;
}

impl PlaneCoordinate for (f64, f64) {
    fn easting(&self) -> f64 {
        self.0
    }
    fn northing(&self) -> f64 {
        self.1
    }
}

impl PlaneCoordinate for Point<f64> {
    fn easting(&self) -> f64 {
        self.x()
    }
    fn northing(&self) -> f64 {
        self.y()
    }
}

impl PlaneCoordinate for Coord<f64> {
    fn easting(&self) -> f64 {
        self.x
    }
    fn northing(&self) -> f64 {
        self.y
    }
}
