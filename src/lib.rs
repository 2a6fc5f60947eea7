//! # tm35fin-pages
//!
//! Enumerates the map sheet grid of the Finnish ETRS-TM35FIN (EPSG:3067)
//! coordinate system, from the 1:200 000 top-level pages down to the
//! 1:5 000 pages, and turns every page into a GeoJSON feature.
//!
//! ### 1. `PageGrid` - Enumeration and Lookup
//!
//! ```
//! use tm35fin_pages::PageGrid;
//!
//! # fn main() -> Result<(), tm35fin_pages::PagesError> {
//! let grid = PageGrid::reference();
//! assert_eq!(grid.pages().count(), 198_375);
//!
//! let page = grid.page("K2")?;
//! let children = grid.subdivide(&page)?;
//! assert_eq!(children[0].identifier, "K21");
//!
//! let here = grid.page_at(&(385_800.0, 6_672_000.0), 3)?;
//! println!("{} {:?}", here.identifier, here.origin);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `PageProjector` - Geographic Features
//!
//! Reprojection is injected; [`ProjReprojector`] uses PROJ. For parallel
//! projection, [`ReprojectorPool`] holds one reprojector per worker thread
//! and [`par_project`] reuses it across batches.
//!
//! ```no_run
//! use tm35fin_pages::{PageGrid, PageProjector, ProjReprojector, write_features};
//!
//! # fn main() -> Result<(), tm35fin_pages::PagesError> {
//! let grid = PageGrid::reference();
//! let projector = PageProjector::new(grid.config(), ProjReprojector::new()?);
//!
//! let features = grid
//!     .subtree(grid.page("V3")?)
//!     .map(|page| projector.project(&page))
//!     .collect::<Result<Vec<_>, _>>()?;
//! write_features(&features, std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```
//!

pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod logging;
pub mod page;
pub mod project;

pub use coord::{PlaneCoordinate, ProjReprojector, Reproject};
pub use error::PagesError;
pub use geom::{geographic_polygon, plane_ring};
pub use grid::{PageGrid, Pages};
pub use index::{
    ACTUALLY_USED_TOP_LEVEL, GridConfig, GridConfigBuilder, LEVEL_SCALES, MAX_LEVEL,
    ParsedIdentifier, Side, parse_identifier,
};
pub use io::{FeaturesToGeoJson, to_feature_collection, write_feature_collection, write_features};
pub use logging::init_logging;
pub use page::{HalfPage, PageRecord};
pub use project::{PageFeature, PageProjector, PageProperties, ReprojectorPool, par_project};

pub use geo_types;
pub use geojson;
