use crate::geom::plane_ring;
use crate::index::Side;
use geo_types::{Coord, LineString, Polygon, Rect, coord};

/// A single map page at one subdivision level of the ETRS-TM35FIN grid.
///
/// # Example
///
/// ```
/// use tm35fin_pages::PageGrid;
///
/// # fn main() -> Result<(), tm35fin_pages::PagesError> {
/// let grid = PageGrid::reference();
/// let page = grid.page("V3133A3")?;
/// assert_eq!(page.level, 5);
/// assert_eq!(page.extent.x, 3000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRecord {
    /// Top-level code followed by one token per subdivision level, e.g. `V3133A3`
    pub identifier: String,
    /// Bottom-left corner in EPSG:3067 (x = easting, y = northing)
    pub origin: Coord<i64>,
    /// Width and height in metres (x = east extent, y = north extent)
    pub extent: Coord<i64>,
    /// Number of subdivision tokens after the top-level code (0 = 1:200 000)
    pub level: u8,
}

impl PageRecord {
    pub(crate) fn new(
        identifier: String,
        origin: Coord<i64>,
        extent: Coord<i64>,
        level: u8,
    ) -> Self {
        Self {
            identifier,
            origin,
            extent,
            level,
        }
    }

    /// The two-character top-level code this page belongs to.
    pub fn top_level(&self) -> &str {
        let end = self
            .identifier
            .char_indices()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(self.identifier.len());
        &self.identifier[..end]
    }

    /// Top-right corner, exclusive.
    pub fn far_corner(&self) -> Coord<i64> {
        coord! {
            x: self.origin.x + self.extent.x,
            y: self.origin.y + self.extent.y,
        }
    }

    /// Center point, rounded down to whole metres.
    pub fn center(&self) -> Coord<i64> {
        coord! {
            x: self.origin.x + self.extent.x / 2,
            y: self.origin.y + self.extent.y / 2,
        }
    }

    /// Area in square metres.
    pub fn area(&self) -> i64 {
        self.extent.x * self.extent.y
    }

    pub fn rect(&self) -> Rect<i64> {
        Rect::new(self.origin, self.far_corner())
    }

    /// The page rectangle as a polygon in plane coordinates.
    pub fn to_plane_polygon(&self) -> Polygon<f64> {
        let ring: Vec<(f64, f64)> = plane_ring(self.origin, self.extent).to_vec();
        Polygon::new(LineString::from(ring), vec![])
    }
}

/// The left or right half of a page's children, named with an `L`/`R` suffix.
///
/// `V313L` covers `V3131` and `V3132`; `V3133R` covers `V3133E` to `V3133H`.
/// Half pages are addressable but are not part of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfPage {
    pub identifier: String,
    pub parent: PageRecord,
    pub side: Side,
    pub origin: Coord<i64>,
    pub extent: Coord<i64>,
}

impl HalfPage {
    pub fn to_plane_polygon(&self) -> Polygon<f64> {
        let ring: Vec<(f64, f64)> = plane_ring(self.origin, self.extent).to_vec();
        Polygon::new(LineString::from(ring), vec![])
    }
}
