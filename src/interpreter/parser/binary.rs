use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            unary::{parse_negation, parse_not},
        },
    },
};

/// Maps a token kind to its corresponding binary operator.
///
/// Returns `None` for all tokens that are not binary operators.
///
/// # Example
/// ```
/// use fwap::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(TokenKind::Plus),
///            Some(BinaryOperator::Add));
/// ```
#[must_use]
pub const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Or => Some(BinaryOperator::Or),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Equal => Some(BinaryOperator::Equal),
        TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        _ => None,
    }
}

/// Folds a left-associative chain `operand (op operand)*`, where `accepts`
/// selects the operators of this precedence level.
fn parse_left_assoc<'a, I>(tokens: &mut Peekable<I>,
                           operand: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                           accepts: fn(BinaryOperator) -> bool)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some(token) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token.kind)
           && accepts(op)
        {
            let token = (*token).clone();
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  token };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses logical OR expressions.
///
/// Grammar: `or := and ("||" and)*`
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// A binary expression tree using `BinaryOperator::Or`.
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_assoc(tokens, parse_logical_and, |op| op == BinaryOperator::Or)
}

/// Parses logical AND expressions.
///
/// Precedence is higher than OR. Each operand may be negated with `!`, which
/// binds looser than the relational operators: `!a == b` is `!(a == b)`.
///
/// Grammar: `and := not ("&&" not)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_assoc(tokens, parse_not, |op| op == BinaryOperator::And)
}

/// Parses relational and equality operators.
///
/// Grammar: `relational := additive (("==" | "!=" | ">" | ">=" | "<" | "<=")
/// additive)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_assoc(tokens, parse_additive, BinaryOperator::is_relational)
}

/// Parses addition and subtraction expressions.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_assoc(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication and division expressions.
///
/// Grammar: `multiplicative := negation (("*" | "/") negation)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_assoc(tokens, parse_negation, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
    })
}
