use crate::coord::PlaneCoordinate;
use crate::error::PagesError;
use crate::index::{GridConfig, Side, half, parse_identifier, split, validate};
use crate::page::{HalfPage, PageRecord};
use geo::Intersects;
use geo_types::{Rect, coord};
use rayon::prelude::*;
use tracing::debug;

/// The hierarchical page grid: enumeration, lookup and spatial queries.
///
/// # Example
///
/// ```
/// use tm35fin_pages::PageGrid;
///
/// let grid = PageGrid::reference();
/// let first: Vec<_> = grid.pages().take(3).map(|p| p.identifier).collect();
/// assert_eq!(first, vec!["K2", "K21", "K211"]);
/// ```
#[derive(Debug, Clone)]
pub struct PageGrid {
    config: GridConfig,
}

impl PageGrid {
    /// Creates a grid from a config, re-validating it.
    pub fn new(config: GridConfig) -> Result<Self, PagesError> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// The ETRS-TM35FIN reference grid.
    pub fn reference() -> Self {
        Self {
            config: GridConfig::default(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn max_level(&self) -> u8 {
        self.config.max_level()
    }

    /// One record per row letter × column code, row-major from the south-west.
    pub fn enumerate_top_level(&self) -> Vec<PageRecord> {
        let rows = self.config.rows().len();
        let cols = self.config.cols().len();
        let mut pages = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                pages.push(self.top_level_page(row, col));
            }
        }
        pages
    }

    fn top_level_page(&self, row: usize, col: usize) -> PageRecord {
        let origin = self.config.origin();
        let extent = self.config.top_extent();
        let page_origin = coord! {
            x: origin.x + col as i64 * extent.x,
            y: origin.y + row as i64 * extent.y,
        };
        let identifier = format!("{}{}", self.config.rows()[row], self.config.cols()[col]);
        PageRecord::new(identifier, page_origin, extent, 0)
    }

    /// Immediate children of a page in directional order.
    ///
    /// Fails with [`PagesError::InvalidLevel`] for pages at the deepest level.
    pub fn subdivide(&self, parent: &PageRecord) -> Result<Vec<PageRecord>, PagesError> {
        if parent.level >= self.max_level() {
            return Err(PagesError::InvalidLevel(parent.level));
        }
        Ok(self.children(parent))
    }

    fn children(&self, parent: &PageRecord) -> Vec<PageRecord> {
        let Some(level) = parent.level.checked_add(1) else {
            return Vec::new();
        };
        let Some(rule) = self.config.rule(level) else {
            return Vec::new();
        };

        split(parent.origin, parent.extent, rule)
            .into_iter()
            .map(|sub| {
                let mut identifier = String::with_capacity(parent.identifier.len() + 1);
                identifier.push_str(&parent.identifier);
                identifier.push(sub.token);
                PageRecord::new(identifier, sub.origin, sub.extent, level)
            })
            .collect()
    }

    /// Every page at every level, depth-first pre-order.
    ///
    /// Top-level pages come row-major (row letter, then column code); each
    /// page is followed by its descendants in directional order.
    pub fn pages(&self) -> Pages<'_> {
        let mut stack = self.enumerate_top_level();
        stack.reverse();
        Pages { grid: self, stack }
    }

    /// A page followed by all of its descendants, depth-first pre-order.
    pub fn subtree(&self, root: PageRecord) -> Pages<'_> {
        Pages {
            grid: self,
            stack: vec![root],
        }
    }

    /// Same sequence as [`PageGrid::pages`], enumerated in parallel per
    /// top-level page.
    pub fn par_pages(&self) -> Vec<PageRecord> {
        let pages: Vec<PageRecord> = self
            .enumerate_top_level()
            .into_par_iter()
            .flat_map_iter(|top| self.subtree(top))
            .collect();
        debug!(count = pages.len(), "enumerated pages");
        pages
    }

    /// Expected number of records at each level, computed from the config.
    pub fn pages_per_level(&self) -> Vec<usize> {
        let mut counts = Vec::with_capacity(self.max_level() as usize + 1);
        let mut count = self.config.rows().len().saturating_mul(self.config.cols().len());
        counts.push(count);
        for level in 1..=self.max_level() {
            count = count.saturating_mul(self.config.rule(level).map_or(0, |r| r.len()));
            counts.push(count);
        }
        counts
    }

    /// Resolves a full page identifier such as `V3133A3`.
    pub fn page(&self, identifier: &str) -> Result<PageRecord, PagesError> {
        let parsed = parse_identifier(identifier, &self.config)?;
        if parsed.side.is_some() {
            return Err(PagesError::InvalidIdentifier {
                identifier: identifier.to_string(),
                reason: "names a half page".to_string(),
            });
        }
        Ok(self.descend(parsed.row, parsed.col, &parsed.path))
    }

    /// Resolves a half-page identifier such as `V313L` or `V3133R`.
    ///
    /// Only pages whose children are split left/right first (four or eight
    /// tokens) have halves.
    pub fn half_page(&self, identifier: &str) -> Result<HalfPage, PagesError> {
        let parsed = parse_identifier(identifier, &self.config)?;
        let invalid = |reason: &str| PagesError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let side = parsed.side.ok_or_else(|| invalid("missing L/R suffix"))?;
        let parent = self.descend(parsed.row, parsed.col, &parsed.path);
        match parent.level.checked_add(1).and_then(|l| self.config.rule(l)) {
            Some(rule) if rule.len() > 2 => {}
            _ => return Err(invalid("page has no left/right halves")),
        }

        let (origin, extent) = half(parent.origin, parent.extent, side == Side::Right);
        Ok(HalfPage {
            identifier: identifier.to_string(),
            parent,
            side,
            origin,
            extent,
        })
    }

    fn descend(&self, row: usize, col: usize, path: &[usize]) -> PageRecord {
        let mut page = self.top_level_page(row, col);
        for &pos in path {
            match self.children(&page).into_iter().nth(pos) {
                Some(child) => page = child,
                None => break,
            }
        }
        page
    }

    /// The page at `level` containing a plane point.
    ///
    /// Pages are half-open: a point on a shared edge belongs to the page to
    /// its north or east.
    pub fn page_at(
        &self,
        coord: &impl PlaneCoordinate,
        level: u8,
    ) -> Result<PageRecord, PagesError> {
        let (easting, northing) = (coord.easting(), coord.northing());
        if level > self.max_level() {
            return Err(PagesError::InvalidLevel(level));
        }
        let out_of_grid = || PagesError::OutOfGrid { easting, northing };
        if !easting.is_finite() || !northing.is_finite() {
            return Err(out_of_grid());
        }

        let origin = self.config.origin();
        let extent = self.config.top_extent();
        let col = ((easting - origin.x as f64) / extent.x as f64).floor();
        let row = ((northing - origin.y as f64) / extent.y as f64).floor();
        if col < 0.0
            || row < 0.0
            || col >= self.config.cols().len() as f64
            || row >= self.config.rows().len() as f64
        {
            return Err(out_of_grid());
        }

        let mut page = self.top_level_page(row as usize, col as usize);
        while page.level < level {
            let rule = self.config.rule(page.level + 1).unwrap_or(&[]);
            let sub = split(page.origin, page.extent, rule)
                .into_iter()
                .find(|sub| sub.contains(easting, northing))
                .ok_or_else(out_of_grid)?;
            let mut identifier = page.identifier;
            identifier.push(sub.token);
            page = PageRecord::new(identifier, sub.origin, sub.extent, page.level + 1);
        }
        Ok(page)
    }

    /// All pages at `level` whose rectangle intersects a plane rectangle.
    ///
    /// Rectangles are closed here, so a page that only touches the query
    /// along an edge is included.
    pub fn pages_intersecting(
        &self,
        rect: &Rect<f64>,
        level: u8,
    ) -> Result<Vec<PageRecord>, PagesError> {
        if level > self.max_level() {
            return Err(PagesError::InvalidLevel(level));
        }

        let mut found = Vec::new();
        let mut stack: Vec<PageRecord> = self.enumerate_top_level();
        stack.reverse();

        while let Some(page) = stack.pop() {
            if !plane_rect(&page).intersects(rect) {
                continue;
            }
            if page.level == level {
                found.push(page);
            } else {
                let mut children = self.children(&page);
                children.reverse();
                stack.extend(children);
            }
        }

        debug!(level, count = found.len(), "pages intersecting query");
        Ok(found)
    }
}

fn plane_rect(page: &PageRecord) -> Rect<f64> {
    let far = page.far_corner();
    Rect::new(
        coord! { x: page.origin.x as f64, y: page.origin.y as f64 },
        coord! { x: far.x as f64, y: far.y as f64 },
    )
}

/// Lazy depth-first pre-order walk over a [`PageGrid`].
///
/// Finite and restartable: call [`PageGrid::pages`] again for a fresh walk.
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    grid: &'a PageGrid,
    stack: Vec<PageRecord>,
}

impl Iterator for Pages<'_> {
    type Item = PageRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.stack.pop()?;
        let mut children = self.grid.children(&page);
        children.reverse();
        self.stack.extend(children);
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn by_id(pages: &[PageRecord], id: &str) -> PageRecord {
        pages
            .iter()
            .find(|p| p.identifier == id)
            .cloned()
            .unwrap_or_else(|| panic!("{id} missing"))
    }

    #[test]
    fn test_enumerate_top_level() {
        let grid = PageGrid::reference();
        let top = grid.enumerate_top_level();
        assert_eq!(top.len(), 75);

        let ids: Vec<_> = top.iter().take(6).map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["K2", "K3", "K4", "K5", "K6", "L2"]);
        assert_eq!(top.last().map(|p| p.identifier.as_str()), Some("Z6"));

        for page in &top {
            assert_eq!(page.level, 0);
            assert_eq!(page.extent, coord! { x: 192_000, y: 96_000 });
        }

        let v3 = by_id(&top, "V3");
        assert_eq!(v3.origin, coord! { x: 116_000, y: 7_530_000 });
        // K4's bottom-right corner anchors the grid
        let k4 = by_id(&top, "K4");
        assert_eq!(k4.far_corner().x, 500_000);
        assert_eq!(k4.origin.y, 6_570_000);
    }

    #[test]
    fn test_k2_children() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let k2 = grid.page("K2")?;
        let children = grid.subdivide(&k2)?;

        let ids: Vec<_> = children.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["K21", "K22", "K23", "K24"]);
        for child in &children {
            assert_eq!(child.extent, coord! { x: 96_000, y: 48_000 });
            assert_eq!(child.level, 1);
        }
        assert_eq!(children[0].origin, k2.origin);
        assert_eq!(
            children[3].origin,
            coord! { x: k2.origin.x + 96_000, y: k2.origin.y + 48_000 }
        );
        // 1 below 2, 1 level with 3 and west of it
        assert!(children[0].origin.y < children[1].origin.y);
        assert_eq!(children[0].origin.y, children[2].origin.y);
        assert!(children[2].origin.x > children[0].origin.x);
        Ok(())
    }

    #[test]
    fn test_eight_way_children() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let parent = grid.page("V3133")?;
        let children = grid.subdivide(&parent)?;
        assert_eq!(children.len(), 8);

        let a = by_id(&children, "V3133A");
        let b = by_id(&children, "V3133B");
        let c = by_id(&children, "V3133C");
        let d = by_id(&children, "V3133D");
        let e = by_id(&children, "V3133E");

        assert_eq!(a.origin.x, b.origin.x);
        assert!(b.origin.y > a.origin.y);
        assert_eq!(c.origin.y, a.origin.y);
        assert_eq!(d.origin.y, b.origin.y);
        assert!(c.origin.x > a.origin.x);

        assert_eq!(e.origin.y, a.origin.y);
        assert_eq!(e.origin.x - a.origin.x, parent.extent.x / 2);
        assert_eq!(a.extent, coord! { x: 6_000, y: 6_000 });
        Ok(())
    }

    #[test]
    fn test_subdivide_at_max_level_fails() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let leaf = grid.page("V3133A3")?;
        assert!(matches!(
            grid.subdivide(&leaf),
            Err(PagesError::InvalidLevel(5))
        ));
        Ok(())
    }

    #[test]
    fn test_completeness_per_level() {
        let grid = PageGrid::reference();
        let expected = vec![75, 300, 1_200, 4_800, 38_400, 153_600];
        assert_eq!(grid.pages_per_level(), expected);

        let mut tally = vec![0usize; 6];
        for page in grid.pages() {
            tally[page.level as usize] += 1;
        }
        assert_eq!(tally, expected);
        assert_eq!(
            tally.iter().sum::<usize>(),
            75 * (1 + 4 + 16 + 64 + 8 * 64 + 4 * 8 * 64)
        );
    }

    #[test]
    fn test_identifiers_unique_and_levels_consistent() {
        let grid = PageGrid::reference();
        let mut seen = HashSet::new();
        for page in grid.pages() {
            assert_eq!(page.identifier.chars().count(), page.level as usize + 2);
            assert!(seen.insert(page.identifier), "duplicate identifier");
        }
        assert_eq!(seen.len(), 198_375);
    }

    #[test]
    fn test_partition_and_prefix() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let root = grid.page("V3")?;

        for parent in grid.subtree(root) {
            if parent.level == grid.max_level() {
                continue;
            }
            let children = grid.subdivide(&parent)?;
            let expected = grid.config().rule(parent.level + 1).map_or(0, |r| r.len());
            assert_eq!(children.len(), expected);

            let area: i64 = children.iter().map(|c| c.area()).sum();
            assert_eq!(area, parent.area());

            for (i, child) in children.iter().enumerate() {
                assert!(child.identifier.starts_with(&parent.identifier));
                assert_eq!(child.level, parent.level + 1);

                let far = child.far_corner();
                let parent_far = parent.far_corner();
                assert!(child.origin.x >= parent.origin.x && child.origin.y >= parent.origin.y);
                assert!(far.x <= parent_far.x && far.y <= parent_far.y);

                for other in &children[i + 1..] {
                    let other_far = other.far_corner();
                    let overlap_e = child.origin.x < other_far.x && other.origin.x < far.x;
                    let overlap_n = child.origin.y < other_far.y && other.origin.y < far.y;
                    assert!(
                        !(overlap_e && overlap_n),
                        "{} overlaps {}",
                        child.identifier,
                        other.identifier
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_pre_order() {
        let grid = PageGrid::reference();
        let ids: Vec<String> = grid.pages().take(12).map(|p| p.identifier).collect();
        assert_eq!(
            ids,
            vec![
                "K2", "K21", "K211", "K2111", "K2111A", "K2111A1", "K2111A2", "K2111A3",
                "K2111A4", "K2111B", "K2111B1", "K2111B2",
            ]
        );

        let v3_index = grid.pages().position(|p| p.identifier == "V3");
        let v31_index = grid.pages().position(|p| p.identifier == "V31");
        assert!(matches!((v3_index, v31_index), (Some(a), Some(b)) if b == a + 1));
    }

    #[test]
    fn test_deterministic_and_parallel_order() {
        let grid = PageGrid::reference();
        let first: Vec<PageRecord> = grid.pages().collect();
        let second: Vec<PageRecord> = grid.pages().collect();
        assert_eq!(first, second);

        let parallel = grid.par_pages();
        assert_eq!(first, parallel);
    }

    #[test]
    fn test_page_lookup_matches_enumeration() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        for page in grid.subtree(grid.page("N5")?).step_by(97) {
            assert_eq!(grid.page(&page.identifier)?, page);
        }

        let leaf = grid.page("V3133A3")?;
        assert_eq!(leaf.level, 5);
        assert_eq!(leaf.extent, coord! { x: 3_000, y: 3_000 });
        Ok(())
    }

    #[test]
    fn test_page_rejects_half_identifier() {
        let grid = PageGrid::reference();
        assert!(matches!(
            grid.page("V313L"),
            Err(PagesError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_half_pages() -> Result<(), PagesError> {
        let grid = PageGrid::reference();

        let left = grid.half_page("V313L")?;
        let v3131 = grid.page("V3131")?;
        let v3132 = grid.page("V3132")?;
        assert_eq!(left.parent.identifier, "V313");
        assert_eq!(left.side, Side::Left);
        assert_eq!(left.origin, v3131.origin);
        assert_eq!(left.extent.x, v3131.extent.x);
        assert_eq!(left.extent.y, v3131.extent.y + v3132.extent.y);
        assert_eq!(left.to_plane_polygon().exterior().coords().count(), 5);

        let right = grid.half_page("V3133R")?;
        let e = grid.page("V3133E")?;
        let h = grid.page("V3133H")?;
        assert_eq!(right.origin, e.origin);
        assert_eq!(
            coord! { x: right.origin.x + right.extent.x, y: right.origin.y + right.extent.y },
            h.far_corner()
        );
        Ok(())
    }

    #[test]
    fn test_half_page_errors() {
        let grid = PageGrid::reference();
        assert!(grid.half_page("V313").is_err());
        assert!(grid.half_page("V3133A3L").is_err());
    }

    #[test]
    fn test_page_at() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let k2 = grid.page("K2")?;
        let (e, n) = (k2.origin.x as f64, k2.origin.y as f64);

        assert_eq!(grid.page_at(&(e, n), 0)?.identifier, "K2");
        assert_eq!(grid.page_at(&(e, n), 5)?.identifier, "K2111A1");
        assert_eq!(grid.page_at(&(e + 1.0, n + 1.0), 1)?.identifier, "K21");
        let point = geo_types::Point::new(e + 1.0, n + 1.0);
        assert_eq!(grid.page_at(&point, 1)?.identifier, "K21");

        // Shared edges belong to the page to the east/north
        assert_eq!(grid.page_at(&(e + 192_000.0, n), 0)?.identifier, "K3");
        assert_eq!(grid.page_at(&(e, n + 96_000.0), 0)?.identifier, "L2");

        let leaf = grid.page("V3133A3")?;
        let center = leaf.center();
        assert_eq!(
            grid.page_at(&(center.x as f64, center.y as f64), 5)?,
            leaf
        );
        Ok(())
    }

    #[test]
    fn test_page_at_errors() {
        let grid = PageGrid::reference();
        assert!(matches!(
            grid.page_at(&(-80_000.0, 6_600_000.0), 0),
            Err(PagesError::OutOfGrid { .. })
        ));
        assert!(matches!(
            grid.page_at(&(400_000.0, 6_000_000.0), 2),
            Err(PagesError::OutOfGrid { .. })
        ));
        assert!(matches!(
            grid.page_at(&(f64::NAN, 7_000_000.0), 2),
            Err(PagesError::OutOfGrid { .. })
        ));
        assert!(matches!(
            grid.page_at(&(400_000.0, 7_000_000.0), 6),
            Err(PagesError::InvalidLevel(6))
        ));
    }

    #[test]
    fn test_pages_intersecting() -> Result<(), PagesError> {
        let grid = PageGrid::reference();
        let v3 = grid.page("V3")?;
        let o = v3.origin;

        let inside = Rect::new(
            coord! { x: o.x as f64 + 10.0, y: o.y as f64 + 10.0 },
            coord! { x: o.x as f64 + 20.0, y: o.y as f64 + 20.0 },
        );
        let hits = grid.pages_intersecting(&inside, 3)?;
        let ids: Vec<_> = hits.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["V3111"]);

        // Straddles the K2/K3 boundary
        let k2 = grid.page("K2")?;
        let edge = k2.far_corner().x as f64;
        let across = Rect::new(
            coord! { x: edge - 100.0, y: k2.origin.y as f64 + 100.0 },
            coord! { x: edge + 100.0, y: k2.origin.y as f64 + 200.0 },
        );
        let ids: Vec<_> = grid
            .pages_intersecting(&across, 0)?
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        assert_eq!(ids, vec!["K2", "K3"]);

        assert!(grid.pages_intersecting(&inside, 9).is_err());
        Ok(())
    }

    #[test]
    fn test_custom_grid() -> Result<(), PagesError> {
        let config = GridConfig::builder()
            .rows("AB")
            .cols("12")
            .origin(0, 0)
            .top_extent(16, 8)
            .subdivisions(&["ABCDEFGH", "xy"])
            .actually_used(&["A1"])
            .build()?;
        let grid = PageGrid::new(config)?;

        assert_eq!(grid.pages_per_level(), vec![4, 32, 64]);
        assert_eq!(grid.pages().count(), 100);

        let b2 = grid.page("B2")?;
        assert_eq!(b2.origin, coord! { x: 16, y: 8 });
        let top = grid.page("B2Hy")?;
        assert_eq!(top.origin, coord! { x: 28, y: 14 });
        assert_eq!(top.extent, coord! { x: 4, y: 2 });
        Ok(())
    }

    #[test]
    fn test_deepest_supported_level() -> Result<(), PagesError> {
        let config = GridConfig::builder()
            .rows("A")
            .cols("1")
            .origin(0, 0)
            .top_extent(16, 8)
            .subdivisions(&vec!["Z"; 254])
            .build()?;
        let grid = PageGrid::new(config)?;
        assert_eq!(grid.max_level(), 254);

        let leaf = grid.page_at(&(3.0, 5.0), 254)?;
        assert_eq!(leaf.level, 254);
        assert_eq!(leaf.identifier.len(), 2 + 254);
        assert!(matches!(
            grid.subdivide(&leaf),
            Err(PagesError::InvalidLevel(254))
        ));
        assert_eq!(grid.pages_per_level(), vec![1; 255]);
        assert_eq!(grid.pages().last(), Some(leaf));
        Ok(())
    }
}
