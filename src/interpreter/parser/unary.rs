use std::iter::Peekable;

use crate::{
    ast::{Call, Expr, Literal, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_relational,
            core::{ParseResult, parse_expression},
            utils::{accept, expect, next_token, parse_comma_separated, peek_kind},
        },
        value::url::UrlValue,
    },
};

/// Parses a logical negation.
///
/// `!` applies to a whole relational expression and is right-associative, so
/// `!!a < b` is `!(!(a < b))`.
///
/// Grammar: `not := "!" not | relational`
pub fn parse_not<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(token) = accept(tokens, TokenKind::Not) {
        let operand = parse_not(tokens)?;
        return Ok(Expr::Unary { op:      UnaryOperator::Not,
                                operand: Box::new(operand),
                                token:   token.clone(), });
    }
    parse_relational(tokens)
}

/// Parses an arithmetic negation.
///
/// Grammar: `negation := "-" negation | primary`
pub fn parse_negation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(token) = accept(tokens, TokenKind::Minus) {
        let operand = parse_negation(tokens)?;
        return Ok(Expr::Unary { op:      UnaryOperator::Neg,
                                operand: Box::new(operand),
                                token:   token.clone(), });
    }
    parse_primary(tokens)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - integer, character, string, url and boolean literals
/// - identifiers
/// - function calls
/// - parenthesized expressions
///
/// Grammar:
/// ```text
///     primary := "(" expression ")" | IDE "(" args ")" | IDE
///              | NUMBER | CHAR | STRING | URL | "true" | "false"
/// ```
///
/// # Errors
/// - `LiteralTooLarge` for integers that do not fit in 32 bits.
/// - `InvalidUrl` for url literals with an out-of-range port.
/// - `UnexpectedToken` for any token that cannot start an expression.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = next_token(tokens)?;
    let value = match token.kind {
        TokenKind::RoundOpen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, TokenKind::RoundClose, "')'")?;
            return Ok(expr);
        },
        TokenKind::Identifier => {
            if peek_kind(tokens) == TokenKind::RoundOpen {
                return parse_call_arguments(tokens, token).map(Expr::Call);
            }
            return Ok(Expr::Variable { token: token.clone() });
        },
        TokenKind::Number => {
            let n = token.text
                         .parse::<i32>()
                         .map_err(|_| ParseError::LiteralTooLarge { token: token.clone() })?;
            Literal::Int(n)
        },
        TokenKind::Char => match token.text.chars().next() {
            Some(c) => Literal::Char(c),
            None => {
                return Err(ParseError::UnexpectedToken { expected: "a character".to_string(),
                                                         found:    token.clone(), });
            },
        },
        TokenKind::String => Literal::Str(token.text.clone()),
        TokenKind::Url => {
            let url = token.text
                           .parse::<UrlValue>()
                           .map_err(|_| ParseError::InvalidUrl { token: token.clone() })?;
            Literal::Url(url)
        },
        TokenKind::True => Literal::Bool(true),
        TokenKind::False => Literal::Bool(false),
        _ => {
            return Err(ParseError::UnexpectedToken { expected: "an expression".to_string(),
                                                     found:    token.clone(), });
        },
    };
    Ok(Expr::Constant { value,
                        token: token.clone() })
}

/// Parses the argument list of a call whose callee has already been consumed.
///
/// Grammar: `args := "(" [expression ("," expression)*] ")"`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at `(`.
/// - `callee`: The identifier token naming the called function.
///
/// # Errors
/// Returns a `ParseError` if the parentheses are missing or an argument is
/// malformed.
pub fn parse_call_arguments<'a, I>(tokens: &mut Peekable<I>, callee: &Token) -> ParseResult<Call>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::RoundOpen, "'(' before call arguments")?;
    let arguments = parse_comma_separated(tokens, parse_expression, TokenKind::RoundClose, true)?;
    Ok(Call { callee: callee.clone(),
              arguments })
}
