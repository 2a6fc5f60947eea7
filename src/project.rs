use crate::coord::Reproject;
use crate::error::PagesError;
use crate::geom::{geographic_polygon, plane_ring};
use crate::index::GridConfig;
use crate::page::PageRecord;
use geo_types::Polygon;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Descriptive attributes attached to every emitted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProperties {
    pub name: String,
    /// Whether the page's top-level code is on the actually-used allow-list.
    pub actually_used: bool,
    pub center_n: i64,
    pub center_e: i64,
    pub scale_n: i64,
    pub scale_e: i64,
    /// Identifier length minus one, so 1 for top-level pages.
    pub level: usize,
}

impl PageProperties {
    pub fn from_page(page: &PageRecord, config: &GridConfig) -> Self {
        let center = page.center();
        Self {
            name: page.identifier.clone(),
            actually_used: config.is_actually_used(page.top_level()),
            center_n: center.y,
            center_e: center.x,
            scale_n: page.extent.y,
            scale_e: page.extent.x,
            level: page.identifier.chars().count() - 1,
        }
    }
}

/// A page ready for output: geographic polygon plus attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFeature {
    pub id: String,
    /// Closed ring of (longitude, latitude) pairs.
    pub geometry: Polygon<f64>,
    pub properties: PageProperties,
}

/// Turns page records into geographic features using an injected reprojector.
///
/// # Example
///
/// ```
/// use tm35fin_pages::{GridConfig, PageGrid, PageProjector, PagesError, Reproject};
///
/// struct Identity;
///
/// impl Reproject for Identity {
///     fn to_geographic(&self, points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, PagesError> {
///         Ok(points.to_vec())
///     }
/// }
///
/// # fn main() -> Result<(), PagesError> {
/// let grid = PageGrid::reference();
/// let projector = PageProjector::new(grid.config(), Identity);
/// let feature = projector.project(&grid.page("V3")?)?;
/// assert!(feature.properties.actually_used);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PageProjector<'a, R> {
    config: &'a GridConfig,
    reprojector: R,
}

impl<'a, R: Reproject> PageProjector<'a, R> {
    pub fn new(config: &'a GridConfig, reprojector: R) -> Self {
        Self {
            config,
            reprojector,
        }
    }

    pub fn project(&self, page: &PageRecord) -> Result<PageFeature, PagesError> {
        project_page(self.config, &self.reprojector, page)
    }
}

fn project_page<R: Reproject>(
    config: &GridConfig,
    reprojector: &R,
    page: &PageRecord,
) -> Result<PageFeature, PagesError> {
    let ring = plane_ring(page.origin, page.extent);
    let geographic = reprojector
        .to_geographic(&ring)
        .inspect_err(|e| warn!(page = %page.identifier, error = %e, "reprojection failed"))?;
    if geographic.len() != ring.len() {
        return Err(PagesError::ProjectionError(format!(
            "{}: reprojected {} of {} corners",
            page.identifier,
            geographic.len(),
            ring.len()
        )));
    }

    Ok(PageFeature {
        id: page.identifier.clone(),
        geometry: geographic_polygon(geographic)?,
        properties: PageProperties::from_page(page, config),
    })
}

/// A fixed set of reprojectors shared by the rayon worker threads.
///
/// Reprojectors are created once, one per worker, and reused across every
/// [`par_project`] call. Each worker locks the slot matching its thread
/// index, so slots are uncontended inside the global pool.
pub struct ReprojectorPool<R> {
    slots: Vec<Mutex<R>>,
}

impl<R: Reproject + Send> ReprojectorPool<R> {
    /// One reprojector per thread of the current rayon pool.
    pub fn new<F>(make: F) -> Result<Self, PagesError>
    where
        F: Fn() -> Result<R, PagesError>,
    {
        Self::with_size(rayon::current_num_threads(), make)
    }

    pub fn with_size<F>(size: usize, make: F) -> Result<Self, PagesError>
    where
        F: Fn() -> Result<R, PagesError>,
    {
        let slots = (0..size.max(1))
            .map(|_| make().map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(reprojectors = slots.len(), "created reprojector pool");
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn with<T>(&self, f: impl FnOnce(&R) -> Result<T, PagesError>) -> Result<T, PagesError> {
        let slot = rayon::current_thread_index().unwrap_or(0) % self.slots.len();
        let reprojector = self.slots[slot]
            .lock()
            .map_err(|_| PagesError::ProjectionError("reprojector lock poisoned".to_string()))?;
        f(&reprojector)
    }
}

impl<R> std::fmt::Debug for ReprojectorPool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReprojectorPool")
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Projects pages in parallel using the pool's reprojectors.
///
/// Output order matches `pages`. The first failure is returned.
pub fn par_project<R>(
    config: &GridConfig,
    pages: &[PageRecord],
    pool: &ReprojectorPool<R>,
) -> Result<Vec<PageFeature>, PagesError>
where
    R: Reproject + Send,
{
    let features: Vec<PageFeature> = pages
        .par_iter()
        .map(|page| pool.with(|reprojector| project_page(config, reprojector, page)))
        .collect::<Result<_, _>>()?;

    debug!(count = features.len(), "projected pages");
    Ok(features)
}
