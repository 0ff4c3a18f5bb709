use thiserror::Error;

use crate::ast::Expr;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected an expression")]
    EmptyExpression,
    #[error("lambda requires at least one variable")]
    MissingBoundVariable,
    #[error("lambda requires a dot before its body")]
    MissingDot,
    #[error("unclosed parenthesis")]
    UnclosedParen,
    #[error("extra closing parenthesis")]
    UnexpectedCloseParen,
    #[error("dot outside of a lambda head")]
    UnexpectedDot,
}

/// Builds the expression described by `tokens`.
/// Note that this function does not beta-reduce the expression.
/// Left associativity is assumed by default:
///
/// ```
/// # use lambda_front::{lexer::tokenize, parser::parse};
/// let parse_str = |s| parse(&tokenize(s).unwrap());
/// assert_eq!(parse_str("a b c d"), parse_str("(((a b) c) d)"));
/// ```
///
/// The lambda body stretches as far as possible:
///
/// ```
/// # use lambda_front::{lexer::tokenize, parser::parse};
/// # let parse_str = |s| parse(&tokenize(s).unwrap());
/// assert_eq!(parse_str("λx. a b c"), parse_str("(λx. a b c)"));
/// assert_eq!(parse_str("λx. a λy. y"), parse_str("(λx. a (λy. y))"));
/// ```
///
/// Unnecessary parentheses are ignored:
///
/// ```
/// # use lambda_front::{lexer::tokenize, parser::parse};
/// # let parse_str = |s| parse(&tokenize(s).unwrap());
/// assert_eq!(parse_str("((((a))))"), parse_str("a"));
/// ```
///
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    sanity_checks(tokens)?;
    parse_expr(tokens)
}

// Parentheses are matched up front, so the recursive descent below only
// ever sees balanced slices.
fn sanity_checks(tokens: &[Token]) -> Result<(), ParseError> {
    let mut paren_count: usize = 0;
    for token in tokens {
        match token {
            Token::OpenParen => paren_count += 1,
            Token::CloseParen => {
                paren_count = paren_count
                    .checked_sub(1)
                    .ok_or(ParseError::UnexpectedCloseParen)?;
            },
            _ => {},
        }
    }
    if paren_count > 0 {
        return Err(ParseError::UnclosedParen);
    }
    Ok(())
}

fn parse_expr(tokens: &[Token]) -> Result<Expr, ParseError> {
    match tokens.first() {
        None => Err(ParseError::EmptyExpression),
        Some(Token::Lambda) => parse_lambda(&tokens[1..]),
        Some(Token::Id(name)) => parse_applied(Expr::var(name), &tokens[1..]),
        Some(Token::OpenParen) => {
            let close = matching_paren_index(tokens)?;
            let inner = parse_expr(&tokens[1..close])?;
            parse_applied(inner, &tokens[close + 1..])
        },
        Some(Token::CloseParen) => Err(ParseError::UnexpectedCloseParen),
        Some(Token::Dot) => Err(ParseError::UnexpectedDot),
    }
}

// `tokens` starts right after the lambda token. Implicit lambdas, e.g.
//  λx y . x
// are treated as equivalent to
//  λx . (λy . x)
//
fn parse_lambda(tokens: &[Token]) -> Result<Expr, ParseError> {
    let var_names: Vec<&str> = tokens
        .iter()
        .map_while(|token| match token {
            Token::Id(name) => Some(*name),
            _ => None,
        })
        .collect();
    if var_names.is_empty() {
        return Err(ParseError::MissingBoundVariable);
    }
    match tokens.get(var_names.len()) {
        Some(Token::Dot) => {},
        _ => return Err(ParseError::MissingDot),
    }
    let body = parse_expr(&tokens[var_names.len() + 1..])?;
    Ok(Expr::lambdas(&var_names, body))
}

// Applies everything in `rest` to `head`, left associatively. A lambda
// swallows the remaining tokens as its body.
fn parse_applied(head: Expr, mut rest: &[Token]) -> Result<Expr, ParseError> {
    let mut result = head;
    loop {
        match rest.first() {
            None => return Ok(result),
            Some(Token::Id(name)) => {
                result = Expr::app(result, Expr::var(name));
                rest = &rest[1..];
            },
            Some(Token::OpenParen) => {
                let close = matching_paren_index(rest)?;
                let arg = parse_expr(&rest[1..close])?;
                result = Expr::app(result, arg);
                rest = &rest[close + 1..];
            },
            Some(Token::Lambda) => {
                let arg = parse_lambda(&rest[1..])?;
                return Ok(Expr::app(result, arg));
            },
            Some(Token::CloseParen) => return Err(ParseError::UnexpectedCloseParen),
            Some(Token::Dot) => return Err(ParseError::UnexpectedDot),
        }
    }
}

// Given tokens where the first one is an open paren, find the index of
// its matching close paren.
fn matching_paren_index(tokens: &[Token]) -> Result<usize, ParseError> {
    let mut depth: usize = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            },
            _ => {},
        }
    }
    Err(ParseError::UnclosedParen)
}
