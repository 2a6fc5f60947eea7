use geo_types::{Coord, coord};

/// One child rectangle produced by splitting a parent rectangle with a token rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRect {
    /// Token appended to the parent identifier.
    pub token: char,
    /// Bottom-left corner (easting, northing).
    pub origin: Coord<i64>,
    /// Width and height (east extent, north extent).
    pub extent: Coord<i64>,
}

impl SubRect {
    /// Half-open containment: the origin edges are inside, the far edges are not.
    pub fn contains(&self, easting: f64, northing: f64) -> bool {
        let min_e = self.origin.x as f64;
        let min_n = self.origin.y as f64;
        easting >= min_e
            && easting < min_e + self.extent.x as f64
            && northing >= min_n
            && northing < min_n + self.extent.y as f64
    }
}

/// Splits a rectangle into one child per token.
///
/// Rules longer than two tokens first split left/right by easting, giving the
/// first half of the tokens to the left half. A two-token rule splits
/// bottom/top by northing. Each half is split again by the same rule, so
/// `"1234"` yields bottom-left, top-left, bottom-right, top-right and
/// `"ABCDEFGH"` yields `ABCD` in the left half and `EFGH` in the right half,
/// each quartered like `"1234"`.
///
/// Rule lengths other than 1, 2, 4 and 8 are rejected when the grid
/// configuration is built, so they never reach this function.
pub fn split(origin: Coord<i64>, extent: Coord<i64>, tokens: &[char]) -> Vec<SubRect> {
    let mut out = Vec::with_capacity(tokens.len());
    split_into(origin, extent, tokens, &mut out);
    out
}

fn split_into(origin: Coord<i64>, extent: Coord<i64>, tokens: &[char], out: &mut Vec<SubRect>) {
    let n = tokens.len();
    if n > 2 {
        let half = coord! { x: extent.x / 2, y: extent.y };
        let right = coord! { x: origin.x + half.x, y: origin.y };
        split_into(origin, half, &tokens[..n / 2], out);
        split_into(right, half, &tokens[n / 2..], out);
    } else if n == 2 {
        let half = coord! { x: extent.x, y: extent.y / 2 };
        let top = coord! { x: origin.x, y: origin.y + half.y };
        split_into(origin, half, &tokens[..1], out);
        split_into(top, half, &tokens[1..], out);
    } else if let Some(&token) = tokens.first() {
        out.push(SubRect {
            token,
            origin,
            extent,
        });
    }
}

/// Number of east and north divisions a rule of `n` tokens applies.
///
/// Returns `None` for lengths with no halving interpretation.
pub fn divisions(n: usize) -> Option<(i64, i64)> {
    match n {
        1 => Some((1, 1)),
        2 => Some((1, 2)),
        4 | 8 => divisions(n / 2).map(|(e, nn)| (e * 2, nn)),
        _ => None,
    }
}

/// Left or right half of a rectangle, split by easting.
pub fn half(origin: Coord<i64>, extent: Coord<i64>, right: bool) -> (Coord<i64>, Coord<i64>) {
    let half = coord! { x: extent.x / 2, y: extent.y };
    if right {
        (coord! { x: origin.x + half.x, y: origin.y }, half)
    } else {
        (origin, half)
    }
}
