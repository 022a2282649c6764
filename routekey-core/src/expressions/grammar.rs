use std::sync::LazyLock;

use regex::Regex;

/// One bracketed accessor token.
///
/// Capture groups: 1 = double-quoted key, 2 = single-quoted key, 3 = array index.
/// Keys exclude ASCII whitespace only (tab, newline, form feed, carriage return, space).
const TOKEN: &str = r#"\[(?:"([^\t\n\x0C\r "]+)"|'([^\t\n\x0C\r ']+)'|(0|[1-9][0-9]*))\]"#;

/// A complete accessor segment: `$` followed by one or more tokens, nothing else.
pub(crate) static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\$(?:{TOKEN})+$")).expect("valid regex"));

/// A single token anchored at the start of the remaining input.
pub(crate) static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{TOKEN}")).expect("valid regex"));

pub(crate) const SIGIL: char = '$';

pub(crate) fn is_accessor(segment: &str) -> bool {
    segment.starts_with(SIGIL)
}
