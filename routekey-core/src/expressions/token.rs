use std::fmt;

use super::grammar::{SIGIL, TOKEN_RE};
use super::template::SyntaxError;

/// One bracketed step of an accessor segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessorToken {
    /// `["key"]` or `['key']`: dereferences an object field.
    Key(String),
    /// `[n]`: dereferences an array element.
    Index(usize),
}

impl fmt::Display for AccessorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorToken::Key(key) if key.contains('"') => write!(f, "['{key}']"),
            AccessorToken::Key(key) => write!(f, "[\"{key}\"]"),
            AccessorToken::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// Split an accessor segment (`$["a"][0]...`) into its tokens.
///
/// A bare `$` yields an empty list; resolving it reports an empty accessor.
/// Anything after the sigil that is not a run of well-formed tokens is a
/// syntax error naming the whole segment.
pub fn tokenize(segment: &str) -> Result<Vec<AccessorToken>, SyntaxError> {
    let Some(mut rest) = segment.strip_prefix(SIGIL) else {
        return Err(SyntaxError::InvalidAccessor(segment.to_string()));
    };

    let mut tokens = Vec::new();
    while !rest.is_empty() {
        let caps = TOKEN_RE
            .captures(rest)
            .ok_or_else(|| SyntaxError::InvalidAccessor(segment.to_string()))?;

        let token = if let Some(key) = caps.get(1).or_else(|| caps.get(2)) {
            AccessorToken::Key(key.as_str().to_string())
        } else if let Some(digits) = caps.get(3) {
            // Indices too large for usize can never be in bounds.
            AccessorToken::Index(digits.as_str().parse().unwrap_or(usize::MAX))
        } else {
            return Err(SyntaxError::InvalidAccessor(segment.to_string()));
        };
        tokens.push(token);

        let consumed = caps.get(0).map_or(0, |m| m.end());
        rest = &rest[consumed..];
    }

    Ok(tokens)
}
