//! Reference constants of the ETRS-TM35FIN map sheet grid (JHS 197).

/// Height of a top-level (1:200 000) page in metres.
pub const TOP_SCALE_N: i64 = 96_000;

/// Width of a top-level (1:200 000) page in metres.
pub const TOP_SCALE_E: i64 = 192_000;

/// Easting of the bottom-right corner of page K4.
pub const K4R_E: i64 = 500_000;

/// Northing of the bottom-right corner of page K4.
pub const K4R_N: i64 = 6_570_000;

/// Easting of the bottom-left corner of page K2, the grid origin.
pub const K2_E: i64 = K4R_E - 3 * TOP_SCALE_E;

/// Northing of the bottom-left corner of page K2, the grid origin.
pub const K2_N: i64 = K4R_N;

/// Top-level row letters, south to north (no `O`).
pub const TOP_LETTERS: &str = "KLMNPQRSTUVWXYZ";

/// Top-level column digits, west to east.
pub const TOP_NUMBERS: &str = "23456";

/// Subdivision tokens for levels 1 to 5.
///
/// Level 0 has no rule since top-level pages are enumerated directly.
pub const SUBDIVISIONS: [&str; 5] = ["1234", "1234", "1234", "ABCDEFGH", "1234"];

/// Deepest level of the reference grid (1:5 000).
pub const MAX_LEVEL: u8 = SUBDIVISIONS.len() as u8;

/// Map scale denominator for each level.
pub const LEVEL_SCALES: [u32; 6] = [200_000, 100_000, 50_000, 25_000, 10_000, 5_000];

/// Suffix naming the left half of a page's children, e.g. `V313L`.
pub const LEFT_HALF: char = 'L';

/// Suffix naming the right half of a page's children, e.g. `V3133R`.
pub const RIGHT_HALF: char = 'R';

/// Top-level pages whose rectangles actually cover Finland.
pub const ACTUALLY_USED_TOP_LEVEL: [&str; 39] = [
    "X4", "X5", //
    "W3", "W4", "W5", //
    "V3", "V4", "V5", //
    "U4", "U5", //
    "T4", "T5", //
    "S4", "S5", //
    "R3", "R4", "R5", //
    "Q3", "Q4", "Q5", //
    "P3", "P4", "P5", "P6", //
    "N3", "N4", "N5", "N6", //
    "M3", "M4", "M5", //
    "L2", "L3", "L4", "L5", //
    "K2", "K3", "K4", "K5",
];
