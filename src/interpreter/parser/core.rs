use std::{iter::Peekable, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Block, BlockKind, Expr, FunctionDef, Program, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_logical_or,
            block::{parse_block, parse_declarations},
            utils::{expect, next_token},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical OR, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_logical_or(tokens)
}

/// Parses a whole program.
///
/// Grammar:
/// ```text
///     program := declaration* "func" "Main" "(" ")" block EOF
/// ```
///
/// The resulting program block holds the top-level declarations followed by
/// the `Main` function definition.
///
/// # Parameters
/// - `tokens`: The comment-free tokens of the source, ending with `EOF`.
///
/// # Errors
/// - `UnexpectedToken` if the entry point is missing or malformed.
/// - `UnexpectedTrailingTokens` if anything follows the `Main` block.
/// - Propagates every error from declaration and block parsing.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = parse_declarations(tokens)?;

    let func = expect(tokens, TokenKind::DeclFunc, "'func Main()' or a declaration")?;
    let main = expect(tokens, TokenKind::Main, "'Main'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after Main")?;
    expect(tokens, TokenKind::RoundClose, "')': Main takes no parameters")?;
    let body = parse_block(tokens, BlockKind::Main)?;

    let last = next_token(tokens)?;
    if !last.is(TokenKind::Eof) {
        return Err(ParseError::UnexpectedTrailingTokens { found: last.clone() });
    }

    debug!(declarations = statements.len(), line = func.line, "parsed program");

    statements.push(Statement::Function(Rc::new(FunctionDef { name: main.clone(),
                                                              params: Vec::new(),
                                                              returns: None,
                                                              body,
                                                              anonymous: false })));

    Ok(Program { main,
                 root: Block { kind: BlockKind::Program,
                               token: None,
                               statements } })
}
