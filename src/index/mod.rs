pub mod config;
pub mod constants;
mod identifier;
mod subdivision;

pub use config::{GridConfig, GridConfigBuilder, validate};
pub use constants::{
    ACTUALLY_USED_TOP_LEVEL, K2_E, K2_N, LEVEL_SCALES, MAX_LEVEL, SUBDIVISIONS, TOP_LETTERS,
    TOP_NUMBERS, TOP_SCALE_E, TOP_SCALE_N,
};
pub use identifier::{ParsedIdentifier, Side, parse_identifier};
pub use subdivision::{SubRect, divisions, half, split};
