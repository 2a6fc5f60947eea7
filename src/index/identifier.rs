use crate::error::PagesError;
use crate::index::config::GridConfig;
use crate::index::constants::{LEFT_HALF, RIGHT_HALF};

/// Left or right half of a page's children, written as an `L` or `R` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn suffix(self) -> char {
        match self {
            Side::Left => LEFT_HALF,
            Side::Right => RIGHT_HALF,
        }
    }
}

/// A page identifier broken into grid positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    /// Index into the config's row letters.
    pub row: usize,
    /// Index into the config's column codes.
    pub col: usize,
    /// Position of each subdivision token within its level's rule.
    pub path: Vec<usize>,
    /// Half-page suffix, if any.
    pub side: Option<Side>,
}

impl ParsedIdentifier {
    /// Level of the page named by the identifier, not counting a half suffix.
    pub fn level(&self) -> u8 {
        self.path.len() as u8
    }
}

/// Parses an identifier such as `V3133A3` or `V313L` against a grid config.
///
/// Validates the top-level code, that each token belongs to the rule of its
/// level, and that no more tokens are given than the grid has levels.
pub fn parse_identifier(id: &str, config: &GridConfig) -> Result<ParsedIdentifier, PagesError> {
    let invalid = |reason: String| PagesError::InvalidIdentifier {
        identifier: id.to_string(),
        reason,
    };

    let mut chars = id.chars();
    let (row_code, col_code) = match (chars.next(), chars.next()) {
        (Some(r), Some(c)) => (r, c),
        _ => return Err(invalid("shorter than a top-level code".to_string())),
    };

    let row = config
        .rows()
        .iter()
        .position(|&r| r == row_code)
        .ok_or_else(|| invalid(format!("unknown row {row_code:?}")))?;
    let col = config
        .cols()
        .iter()
        .position(|&c| c == col_code)
        .ok_or_else(|| invalid(format!("unknown column {col_code:?}")))?;

    let mut tokens: Vec<char> = chars.collect();
    let side = match tokens.last() {
        Some(&LEFT_HALF) => Some(Side::Left),
        Some(&RIGHT_HALF) => Some(Side::Right),
        _ => None,
    };
    if side.is_some() {
        tokens.pop();
    }

    if tokens.len() > config.max_level() as usize {
        return Err(invalid(format!(
            "{} subdivision tokens exceed the deepest level {}",
            tokens.len(),
            config.max_level()
        )));
    }

    let mut path = Vec::with_capacity(tokens.len());
    for (i, &token) in tokens.iter().enumerate() {
        let level = i as u8 + 1;
        let rule = config.rule(level).unwrap_or(&[]);
        let pos = rule
            .iter()
            .position(|&t| t == token)
            .ok_or_else(|| invalid(format!("token {token:?} is not valid at level {level}")))?;
        path.push(pos);
    }

    Ok(ParsedIdentifier {
        row,
        col,
        path,
        side,
    })
}
