use thiserror::Error;

/// Error type for tm35fin-pages operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PagesError {
    /// A subdivision rule has a token count with no halving interpretation,
    /// or contains duplicate or reserved tokens.
    #[error("Invalid subdivision rule for level {level}: {reason}")]
    InvalidSubdivision { level: u8, reason: String },
    /// The top-level grid definition is inconsistent (empty or duplicate codes,
    /// non-positive extent, extents that do not halve exactly).
    #[error("Inconsistent grid: {0}")]
    InconsistentGrid(String),
    /// The page identifier could not be parsed.
    #[error("Invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
    /// The level is outside the configured range.
    #[error("Invalid level: {0}")]
    InvalidLevel(u8),
    /// The plane coordinate is not covered by any top-level page.
    #[error("Coordinate ({easting}, {northing}) is outside the grid")]
    OutOfGrid { easting: f64, northing: f64 },
    /// Coordinate reprojection failed (EPSG:3067 to WGS84).
    #[error("Projection error: {0}")]
    ProjectionError(String),
    /// A feature could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// File or stream I/O error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PagesError {
    fn from(e: std::io::Error) -> Self {
        PagesError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for PagesError {
    fn from(e: serde_json::Error) -> Self {
        PagesError::SerializationError(e.to_string())
    }
}
