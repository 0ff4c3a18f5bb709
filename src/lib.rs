//! An untyped lambda calculus front end.
//!
//! Text goes through [`lexer::tokenize`] and [`parser::parse`] to become an
//! [`Expr`], which can then be beta reduced one step at a time
//! ([`reduce::reduce`]) or all the way to its normal form
//! ([`reduce::normalize`]), compared up to renaming of bound variables
//! ([`alpha::is_alpha_equivalent`]), and printed back ([`as_string`]).
//!
//! ```
//! use lambda_front::{as_string, parse_str, reduce::{normalize, Limits}};
//!
//! let expr = parse_str("(λn s z. s (n s z)) (λs z. z)").unwrap();
//! let normal = normalize(&expr, &Limits::max_steps(100)).unwrap();
//! assert_eq!(as_string(&normal), "λ s z . s z");
//! ```

pub mod alpha;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod reduce;

use thiserror::Error;

pub use alpha::is_alpha_equivalent;
pub use ast::{as_string, Expr};
pub use lexer::{tokenize, LexError, Token};
pub use parser::{parse, ParseError};
pub use reduce::{is_reducible, normalize, reduce, substitute, Limits, ReductionError};

/// Anything that can go wrong between some text and its normal form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lexing error: {0}")]
    Lex(#[from] LexError),
    #[error("parsing error: {0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Reduction(#[from] ReductionError),
}

/// Tokenizes and parses `text` in one go.
pub fn parse_str(text: &str) -> Result<Expr, Error> {
    let tokens = tokenize(text)?;
    Ok(parse(&tokens)?)
}
