use crate::error::PagesError;
use crate::index::constants::{
    ACTUALLY_USED_TOP_LEVEL, K2_E, K2_N, LEFT_HALF, RIGHT_HALF, SUBDIVISIONS, TOP_LETTERS,
    TOP_NUMBERS, TOP_SCALE_E, TOP_SCALE_N,
};
use crate::index::subdivision::divisions;
use geo_types::{Coord, coord};
use std::collections::HashSet;

/// Read-only definition of a hierarchical map page grid.
///
/// `GridConfig::default()` is the ETRS-TM35FIN reference grid. Other grids
/// can be described with [`GridConfig::builder`], which validates the
/// definition before handing out a config.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    rows: Vec<char>,
    cols: Vec<char>,
    origin: Coord<i64>,
    top_extent: Coord<i64>,
    subdivisions: Vec<Vec<char>>,
    actually_used: HashSet<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: TOP_LETTERS.chars().collect(),
            cols: TOP_NUMBERS.chars().collect(),
            origin: coord! { x: K2_E, y: K2_N },
            top_extent: coord! { x: TOP_SCALE_E, y: TOP_SCALE_N },
            subdivisions: SUBDIVISIONS.iter().map(|s| s.chars().collect()).collect(),
            actually_used: ACTUALLY_USED_TOP_LEVEL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GridConfig {
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::new()
    }

    /// Row letters, ordered south to north.
    pub fn rows(&self) -> &[char] {
        &self.rows
    }

    /// Column codes, ordered west to east.
    pub fn cols(&self) -> &[char] {
        &self.cols
    }

    /// Bottom-left corner of the south-west top-level page.
    pub fn origin(&self) -> Coord<i64> {
        self.origin
    }

    /// Width and height of a top-level page.
    pub fn top_extent(&self) -> Coord<i64> {
        self.top_extent
    }

    /// Deepest level, equal to the number of subdivision rules.
    pub fn max_level(&self) -> u8 {
        self.subdivisions.len() as u8
    }

    /// Tokens that subdivide a page at `level - 1` into pages at `level`.
    ///
    /// Level 0 has no rule.
    pub fn rule(&self, level: u8) -> Option<&[char]> {
        if level == 0 {
            return None;
        }
        self.subdivisions
            .get(level as usize - 1)
            .map(|r| r.as_slice())
    }

    /// Whether a top-level code is on the actually-used allow-list.
    pub fn is_actually_used(&self, top_level: &str) -> bool {
        self.actually_used.contains(top_level)
    }
}

#[derive(Debug, Default)]
pub struct GridConfigBuilder {
    rows: Option<String>,
    cols: Option<String>,
    origin: Option<(i64, i64)>,
    top_extent: Option<(i64, i64)>,
    subdivisions: Option<Vec<String>>,
    actually_used: Option<Vec<String>>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, rows: impl Into<String>) -> Self {
        self.rows = Some(rows.into());
        self
    }

    pub fn cols(mut self, cols: impl Into<String>) -> Self {
        self.cols = Some(cols.into());
        self
    }

    pub fn origin(mut self, easting: i64, northing: i64) -> Self {
        self.origin = Some((easting, northing));
        self
    }

    pub fn top_extent(mut self, east: i64, north: i64) -> Self {
        self.top_extent = Some((east, north));
        self
    }

    pub fn subdivisions<S: AsRef<str>>(mut self, rules: &[S]) -> Self {
        self.subdivisions = Some(rules.iter().map(|r| r.as_ref().to_string()).collect());
        self
    }

    pub fn actually_used<S: AsRef<str>>(mut self, codes: &[S]) -> Self {
        self.actually_used = Some(codes.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Builds and validates the config. Unset fields fall back to the
    /// reference grid.
    pub fn build(self) -> Result<GridConfig, PagesError> {
        let reference = GridConfig::default();

        let config = GridConfig {
            rows: self
                .rows
                .map(|r| r.chars().collect())
                .unwrap_or(reference.rows),
            cols: self
                .cols
                .map(|c| c.chars().collect())
                .unwrap_or(reference.cols),
            origin: self
                .origin
                .map(|(x, y)| coord! { x: x, y: y })
                .unwrap_or(reference.origin),
            top_extent: self
                .top_extent
                .map(|(x, y)| coord! { x: x, y: y })
                .unwrap_or(reference.top_extent),
            subdivisions: self
                .subdivisions
                .map(|rules| rules.iter().map(|r| r.chars().collect()).collect())
                .unwrap_or(reference.subdivisions),
            actually_used: self
                .actually_used
                .map(|codes| codes.into_iter().collect())
                .unwrap_or(reference.actually_used),
        };

        validate(&config)?;
        Ok(config)
    }
}

/// Checks a grid definition eagerly so enumeration can never skip a level
/// or produce overlapping pages.
pub fn validate(config: &GridConfig) -> Result<(), PagesError> {
    check_codes("row", &config.rows)?;
    check_codes("column", &config.cols)?;

    if config.top_extent.x <= 0 || config.top_extent.y <= 0 {
        return Err(PagesError::InconsistentGrid(format!(
            "top-level extent must be positive, got ({}, {})",
            config.top_extent.x, config.top_extent.y
        )));
    }

    check_far_corner(config)?;

    // The deepest page must still have a representable child level
    if config.subdivisions.len() >= u8::MAX as usize {
        return Err(PagesError::InconsistentGrid(format!(
            "{} subdivision rules exceed the limit of {}",
            config.subdivisions.len(),
            u8::MAX - 1
        )));
    }

    let mut extent = config.top_extent;
    for (i, rule) in config.subdivisions.iter().enumerate() {
        let level = i as u8 + 1;
        let (east_div, north_div) =
            divisions(rule.len()).ok_or_else(|| PagesError::InvalidSubdivision {
                level,
                reason: format!("{} tokens cannot be halved or quartered", rule.len()),
            })?;

        let mut seen = HashSet::with_capacity(rule.len());
        for &token in rule {
            if token == LEFT_HALF || token == RIGHT_HALF {
                return Err(PagesError::InvalidSubdivision {
                    level,
                    reason: format!("token {token:?} is reserved for half pages"),
                });
            }
            if !token.is_ascii_alphanumeric() {
                return Err(PagesError::InvalidSubdivision {
                    level,
                    reason: format!("token {token:?} is not ASCII alphanumeric"),
                });
            }
            if !seen.insert(token) {
                return Err(PagesError::InvalidSubdivision {
                    level,
                    reason: format!("duplicate token {token:?}"),
                });
            }
        }

        if extent.x % east_div != 0 || extent.y % north_div != 0 {
            return Err(PagesError::InconsistentGrid(format!(
                "extent ({}, {}) does not split evenly at level {level}",
                extent.x, extent.y
            )));
        }
        extent = coord! { x: extent.x / east_div, y: extent.y / north_div };
    }

    Ok(())
}

fn check_far_corner(config: &GridConfig) -> Result<(), PagesError> {
    let span = |origin: i64, count: usize, extent: i64| {
        i64::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(extent))
            .and_then(|len| origin.checked_add(len))
    };

    let far_e = span(config.origin.x, config.cols.len(), config.top_extent.x);
    let far_n = span(config.origin.y, config.rows.len(), config.top_extent.y);
    let area = config.top_extent.x.checked_mul(config.top_extent.y);
    if far_e.is_none() || far_n.is_none() || area.is_none() {
        return Err(PagesError::InconsistentGrid(format!(
            "grid from ({}, {}) with {}x{} pages of ({}, {}) overflows plane coordinates",
            config.origin.x,
            config.origin.y,
            config.cols.len(),
            config.rows.len(),
            config.top_extent.x,
            config.top_extent.y
        )));
    }
    Ok(())
}

fn check_codes(kind: &str, codes: &[char]) -> Result<(), PagesError> {
    if codes.is_empty() {
        return Err(PagesError::InconsistentGrid(format!("no top-level {kind} codes")));
    }
    let mut seen = HashSet::with_capacity(codes.len());
    for &c in codes {
        if !c.is_ascii_alphanumeric() {
            return Err(PagesError::InconsistentGrid(format!(
                "top-level {kind} code {c:?} is not ASCII alphanumeric"
            )));
        }
        if !seen.insert(c) {
            return Err(PagesError::InconsistentGrid(format!(
                "duplicate top-level {kind} code {c:?}"
            )));
        }
    }
    Ok(())
}
