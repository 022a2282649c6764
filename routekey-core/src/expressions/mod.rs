mod eval;
mod grammar;
mod template;
mod token;

pub use eval::{evaluate, EvalError, ResolveError};
pub use template::{parse_template, validate, Segment, SyntaxError, Template};
pub use token::{tokenize, AccessorToken};
