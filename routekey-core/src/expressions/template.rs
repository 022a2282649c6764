use super::grammar::{is_accessor, SEGMENT_RE};
use super::token::{tokenize, AccessorToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Accessor {
        raw: String,
        tokens: Vec<AccessorToken>,
    },
}

impl Segment {
    pub fn raw(&self) -> &str {
        match self {
            Segment::Literal(text) => text,
            Segment::Accessor { raw, .. } => raw,
        }
    }
}

/// A validated routing-key template, split and tokenized once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    delimiter: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the template contains no accessor and always renders to itself.
    pub fn is_constant(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }
}

/// Check a template against the routing-key grammar without touching any record.
pub fn validate(template: &str, delimiter: &str) -> Result<(), SyntaxError> {
    if template.is_empty() {
        return Err(SyntaxError::EmptyTemplate);
    }
    if delimiter.is_empty() {
        return Err(SyntaxError::EmptyDelimiter);
    }

    for (position, segment) in template.split(delimiter).enumerate() {
        if segment.is_empty() {
            return Err(SyntaxError::EmptySegment { position });
        }
        if is_accessor(segment) && !SEGMENT_RE.is_match(segment) {
            return Err(SyntaxError::InvalidAccessor(segment.to_string()));
        }
    }

    Ok(())
}

/// Validate `template` and pre-tokenize its accessor segments.
pub fn parse_template(template: &str, delimiter: &str) -> Result<Template, SyntaxError> {
    validate(template, delimiter)?;

    let mut segments = Vec::new();
    for part in template.split(delimiter) {
        if is_accessor(part) {
            segments.push(Segment::Accessor {
                raw: part.to_string(),
                tokens: tokenize(part)?,
            });
        } else {
            segments.push(Segment::Literal(part.to_string()));
        }
    }

    Ok(Template {
        source: template.to_string(),
        delimiter: delimiter.to_string(),
        segments,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("routing key template must not be empty")]
    EmptyTemplate,
    #[error("routing key delimiter must not be empty")]
    EmptyDelimiter,
    #[error("routing key template contains an empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("the record accessor '{0}' is invalid")]
    InvalidAccessor(String),
}
