use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Block, BlockKind, Expr, FunctionDef, Param, Statement},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_statement,
            types::{parse_optional_type, parse_scalar, parse_type},
            utils::{accept, expect, parse_comma_separated, parse_identifier, peek_kind, peek_second},
        },
    },
};

/// Parses a block delimited by braces.
///
/// A block starts with its declarations, followed by zero or more statements.
/// Parsing continues until a closing `}` token is encountered.
///
/// Grammar: `block := "{" declaration* statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
/// - `kind`: Which block this is, recorded in the node.
///
/// # Returns
/// The parsed [`Block`].
///
/// # Errors
/// - `UnexpectedToken` if the braces are missing or a token cannot start a
///   statement.
/// - Propagates errors from declarations and statements.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, kind: BlockKind) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    let open = expect(tokens, TokenKind::CurlyOpen, "'{'")?.clone();
    let mut statements = parse_declarations(tokens)?;
    while peek_kind(tokens).starts_statement() {
        statements.push(parse_statement(tokens)?);
    }
    expect(tokens, TokenKind::CurlyClose, "'}' or a statement")?;
    Ok(Block { kind,
               token: Some(open),
               statements })
}

/// Parses a run of variable and function declarations.
///
/// A `func` keyword only starts a declaration when an identifier follows it;
/// at program level `func Main` ends the declarations.
///
/// Grammar: `declarations := (var_declaration | function_declaration)*`
///
/// # Returns
/// One statement per declared name.
pub fn parse_declarations<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();
    loop {
        match peek_kind(tokens) {
            TokenKind::DeclVar => statements.extend(parse_var_declaration(tokens)?),
            TokenKind::DeclFunc if peek_second(tokens) == TokenKind::Identifier => {
                statements.push(parse_function_declaration(tokens)?);
            },
            _ => break,
        }
    }
    Ok(statements)
}

/// Parses a variable declaration.
///
/// Two forms are accepted; the token after the first identifier selects one:
///
/// ```text
///     var x int = 5;                  // type first, single variable
///     var a = 1, b, c = a + 1 int;    // several variables sharing a trailing type
/// ```
///
/// # Returns
/// One `Statement::Declaration` per declared variable, in source order.
///
/// # Errors
/// Returns a `ParseError` if an identifier, the type, an initializer or the
/// closing `;` is malformed.
fn parse_var_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::DeclVar, "'var'")?;
    let first = parse_identifier(tokens)?;

    if peek_kind(tokens).is_type_keyword() {
        let ty = parse_type(tokens)?;
        let init = parse_initializer(tokens)?;
        expect(tokens, TokenKind::Semicolon, "';' after declaration")?;
        return Ok(vec![Statement::Declaration { name: first, ty, init }]);
    }

    let mut pending = vec![(first, parse_initializer(tokens)?)];
    while accept(tokens, TokenKind::Comma).is_some() {
        let name = parse_identifier(tokens)?;
        pending.push((name, parse_initializer(tokens)?));
    }
    let ty = parse_type(tokens)?;
    expect(tokens, TokenKind::Semicolon, "';' after declaration")?;

    Ok(pending.into_iter()
              .map(|(name, init)| Statement::Declaration { name,
                                                           ty: ty.clone(),
                                                           init })
              .collect())
}

/// Parses `= expression` if the next token is `=`.
fn parse_initializer<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Expr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    if accept(tokens, TokenKind::Assign).is_some() {
        parse_expression(tokens).map(Some)
    } else {
        Ok(None)
    }
}

/// Parses a named function definition.
///
/// Grammar: `function := "func" IDE "(" params ")" [type] block`
///
/// # Errors
/// Returns a `ParseError` if the name, the parameter list, the return type or
/// the body is malformed.
fn parse_function_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::DeclFunc, "'func'")?;
    let name = parse_identifier(tokens)?;
    let def = parse_function_rest(tokens, name, false)?;
    Ok(Statement::Function(Rc::new(def)))
}

/// Parses an anonymous function, as found after `return`.
///
/// Grammar: `anonymous := "func" "(" params ")" [type] block`
///
/// The `func` token stands in for the missing name.
pub fn parse_anonymous_function<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionDef>
    where I: Iterator<Item = &'a Token> + Clone
{
    let func = expect(tokens, TokenKind::DeclFunc, "'func'")?.clone();
    parse_function_rest(tokens, func, true)
}

/// Parses the parameter list, return type and body shared by named and
/// anonymous functions.
fn parse_function_rest<'a, I>(tokens: &mut Peekable<I>,
                              name: Token,
                              anonymous: bool)
                              -> ParseResult<FunctionDef>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::RoundOpen, "'(' before parameters")?;
    let params = parse_comma_separated(tokens, parse_param, TokenKind::RoundClose, true)?;
    let returns = parse_optional_type(tokens)?;
    let body = parse_block(tokens, BlockKind::Plain)?;
    Ok(FunctionDef { name,
                     params,
                     returns,
                     body,
                     anonymous })
}

/// Parses a single `name scalar` parameter.
fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = parse_identifier(tokens)?;
    let ty = parse_scalar(tokens)?;
    Ok(Param { name, ty })
}
