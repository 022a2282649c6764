use std::collections::HashMap;

use serde_json::Value;

use super::grammar::is_accessor;
use super::template::{Segment, SyntaxError, Template};
use super::token::{tokenize, AccessorToken};
use crate::record::{render_node, Node, Record};

/// Evaluate a raw template against `record`.
///
/// Accessor segments are tokenized the first time they are met; a repeated
/// segment is served from a per-call memo, so with `mutate` set a value is
/// removed at most once per evaluation.
pub fn evaluate(
    template: &str,
    delimiter: &str,
    mutate: bool,
    record: &mut Record,
) -> Result<String, EvalError> {
    if delimiter.is_empty() {
        return Err(SyntaxError::EmptyDelimiter.into());
    }

    let pieces = template.split(delimiter).map(|part| {
        if is_accessor(part) {
            Piece::Accessor(part, None)
        } else {
            Piece::Literal(part)
        }
    });
    render(pieces, delimiter, mutate, record)
}

impl Template {
    /// Evaluate this pre-validated template against `record`.
    pub fn evaluate(&self, record: &mut Record, mutate: bool) -> Result<String, EvalError> {
        let pieces = self.segments().iter().map(|segment| match segment {
            Segment::Literal(text) => Piece::Literal(text.as_str()),
            Segment::Accessor { raw, tokens } => {
                Piece::Accessor(raw.as_str(), Some(tokens.as_slice()))
            }
        });
        render(pieces, self.delimiter(), mutate, record)
    }
}

enum Piece<'t> {
    Literal(&'t str),
    /// Raw segment text plus its tokens, when they are already known.
    Accessor(&'t str, Option<&'t [AccessorToken]>),
}

fn render<'t>(
    pieces: impl Iterator<Item = Piece<'t>>,
    delimiter: &str,
    mutate: bool,
    record: &mut Record,
) -> Result<String, EvalError> {
    let mut memo: HashMap<&'t str, String> = HashMap::new();
    let mut out: Vec<String> = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push(text.to_string()),
            Piece::Accessor(raw, known) => {
                if let Some(hit) = memo.get(raw) {
                    out.push(hit.clone());
                    continue;
                }

                let tokenized;
                let tokens = match known {
                    Some(tokens) => tokens,
                    None => {
                        tokenized = tokenize(raw)?;
                        tokenized.as_slice()
                    }
                };

                let value =
                    resolve_in_object(record, tokens, mutate).map_err(|source| {
                        EvalError::Resolve {
                            segment: raw.to_string(),
                            source,
                        }
                    })?;
                memo.insert(raw, value.clone());
                out.push(value);
            }
        }
    }

    Ok(out.join(delimiter))
}

fn resolve_in_object(
    map: &mut Record,
    tokens: &[AccessorToken],
    mutate: bool,
) -> Result<String, ResolveError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(ResolveError::EmptyAccessor);
    };
    let key = match first {
        AccessorToken::Key(key) => key,
        AccessorToken::Index(idx) => return Err(ResolveError::ArrayAccessorOnRecord(*idx)),
    };

    if rest.is_empty() {
        let rendered = map
            .get(key)
            .map(render_node)
            .ok_or_else(|| ResolveError::KeyNotFound(key.clone()))?;
        if mutate {
            map.remove(key);
        }
        return Ok(rendered);
    }

    let node = map
        .get_mut(key)
        .ok_or_else(|| ResolveError::KeyNotFound(key.clone()))?;
    descend(node, first, rest, mutate)
}

fn resolve_in_array(
    items: &mut Vec<Node>,
    tokens: &[AccessorToken],
    mutate: bool,
) -> Result<String, ResolveError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(ResolveError::EmptyAccessor);
    };
    let idx = match first {
        AccessorToken::Index(idx) => *idx,
        AccessorToken::Key(key) => return Err(ResolveError::RecordAccessorOnArray(key.clone())),
    };
    if idx >= items.len() {
        return Err(ResolveError::IndexOutOfBounds {
            index: idx,
            len: items.len(),
        });
    }

    if rest.is_empty() {
        let rendered = render_node(&items[idx]);
        if mutate {
            // Later elements shift down by one.
            items.remove(idx);
        }
        return Ok(rendered);
    }

    descend(&mut items[idx], first, rest, mutate)
}

fn descend(
    node: &mut Node,
    via: &AccessorToken,
    rest: &[AccessorToken],
    mutate: bool,
) -> Result<String, ResolveError> {
    match node {
        Value::Object(map) => resolve_in_object(map, rest, mutate),
        Value::Array(items) => resolve_in_array(items, rest, mutate),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(ResolveError::NotTraversable(via.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("the record accessor doesn't contain any tokens")]
    EmptyAccessor,
    #[error("can't access the record with the key '{0}'")]
    KeyNotFound(String),
    #[error("the index {index} exceeds the array size {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("couldn't access the record with the array accessor '[{0}]', a quoted key is required")]
    ArrayAccessorOnRecord(usize),
    #[error("couldn't access the array with the key '{0}', an index is required")]
    RecordAccessorOnArray(String),
    #[error("the value at '{0}' is neither an object nor an array")]
    NotTraversable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("failed to resolve '{segment}': {source}")]
    Resolve {
        segment: String,
        #[source]
        source: ResolveError,
    },
}
