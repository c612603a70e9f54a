use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            utils::{expect, next_token, parse_comma_separated, peek_kind},
        },
        value::types::{Scalar, Type},
    },
};

/// Maps a scalar type keyword to its [`Scalar`].
#[must_use]
pub const fn token_to_scalar(kind: TokenKind) -> Option<Scalar> {
    match kind {
        TokenKind::TypeInt => Some(Scalar::Int),
        TokenKind::TypeBool => Some(Scalar::Bool),
        TokenKind::TypeChar => Some(Scalar::Char),
        TokenKind::TypeString => Some(Scalar::String),
        TokenKind::TypeUrl => Some(Scalar::Url),
        _ => None,
    }
}

/// Parses a type.
///
/// Grammar:
/// ```text
///     type := "int" | "bool" | "char" | "string" | "url"
///           | "fun" "(" [scalar ("," scalar)*] ")" [type]
/// ```
///
/// The return type of a function type is present whenever the token after
/// the closing `)` is a type keyword.
///
/// # Errors
/// - `ExpectedType` if the next token is not a type keyword.
/// - `ScalarTypeRequired` if `fun` appears in the parameter list.
pub fn parse_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Type>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = next_token(tokens)?;
    if let Some(scalar) = token_to_scalar(token.kind) {
        return Ok(Type::Scalar(scalar));
    }
    if !token.is(TokenKind::TypeFun) {
        return Err(ParseError::ExpectedType { found: token.clone() });
    }

    expect(tokens, TokenKind::RoundOpen, "'(' after 'fun'")?;
    let params = parse_comma_separated(tokens, parse_scalar, TokenKind::RoundClose, true)?;
    let returns = parse_optional_type(tokens)?;
    Ok(Type::function(params, returns))
}

/// Parses a type if the next token starts one.
///
/// # Errors
/// Propagates errors from [`parse_type`].
pub fn parse_optional_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Type>>
    where I: Iterator<Item = &'a Token> + Clone
{
    if peek_kind(tokens).is_type_keyword() {
        parse_type(tokens).map(Some)
    } else {
        Ok(None)
    }
}

/// Parses a scalar type keyword.
///
/// # Errors
/// - `ScalarTypeRequired` for `fun`.
/// - `ExpectedType` for any other non-type token.
pub fn parse_scalar<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Scalar>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = next_token(tokens)?;
    match token_to_scalar(token.kind) {
        Some(scalar) => Ok(scalar),
        None if token.is(TokenKind::TypeFun) => {
            Err(ParseError::ScalarTypeRequired { found: token.clone() })
        },
        None => Err(ParseError::ExpectedType { found: token.clone() }),
    }
}
