use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Position, Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Consumes the next token.
///
/// # Errors
/// Returns `UnexpectedEndOfInput` if the stream is exhausted, which only
/// happens when a caller reads past the `EOF` token.
pub(in crate::interpreter::parser) fn next_token<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next()
          .ok_or(ParseError::UnexpectedEndOfInput { at: Position::default() })
}

/// Consumes the next token and checks that it has the given kind.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `kind`: The required kind.
/// - `expected`: How the required token is described in the error message.
///
/// # Returns
/// The consumed token.
///
/// # Errors
/// Returns `UnexpectedToken` carrying the offending token if the kind differs.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    let token = next_token(tokens)?;
    if token.is(kind) {
        Ok(token)
    } else {
        Err(ParseError::UnexpectedToken { expected: expected.to_string(),
                                          found:    token.clone(), })
    }
}

/// Parses an identifier and returns its token.
///
/// # Errors
/// Returns `UnexpectedToken` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<Token>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, TokenKind::Identifier, "an identifier").cloned()
}

/// Returns the kind of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Returns the kind of the token after the next one, using a cloned cursor.
pub(in crate::interpreter::parser) fn peek_second<'a, I>(tokens: &Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    lookahead.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Consumes the next token if it has the given kind.
pub(in crate::interpreter::parser) fn accept<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind)
                                                    -> Option<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next_if(|token| token.is(kind))
}

/// Parses a comma-separated list of items until a closing token.
///
/// The closing token is consumed. An immediately encountered closing token
/// produces an empty list when `allow_empty` is set.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The kind of token that terminates the list.
/// - `allow_empty`: Whether the list may have no items.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - a token other than `,` or the closing token follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: TokenKind,
    allow_empty: bool)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    if allow_empty && accept(tokens, closing).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        let token = next_token(tokens)?;
        match token.kind {
            TokenKind::Comma => {},
            kind if kind == closing => break,
            _ => {
                return Err(ParseError::UnexpectedToken { expected: format!("',' or {closing}"),
                                                         found:    token.clone(), });
            },
        }
    }
    Ok(items)
}
