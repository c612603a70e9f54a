use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Assign, BinaryOperator, BlockKind, Expr, Literal, ReturnValue, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::{parse_anonymous_function, parse_block},
            core::{ParseResult, parse_expression},
            unary::parse_call_arguments,
            utils::{accept, expect, next_token, parse_comma_separated, parse_identifier, peek_kind},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a call, an assignment, or a `readln`/`async`/`dasync` assignment, all
///   starting with an identifier,
/// - `if`, `while` or `for`,
/// - `return`,
/// - `println`,
/// - a nested block.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Statement`] node.
///
/// # Errors
/// - `UnexpectedToken` if the leading token cannot start a statement.
/// - Propagates errors of the selected statement form.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    match peek_kind(tokens) {
        TokenKind::Identifier => parse_identifier_statement(tokens),
        TokenKind::If => parse_if(tokens),
        TokenKind::While => parse_while(tokens),
        TokenKind::For => parse_for(tokens),
        TokenKind::Return => parse_return(tokens),
        TokenKind::Println => parse_println(tokens),
        TokenKind::CurlyOpen => parse_block(tokens, BlockKind::Plain).map(Statement::Block),
        _ => {
            let token = next_token(tokens)?;
            Err(ParseError::UnexpectedToken { expected: "a statement".to_string(),
                                              found:    token.clone(), })
        },
    }
}

/// Parses the statements that start with an identifier.
///
/// ```text
///     f(args);
///     x = readln();
///     x = async(expression);
///     x = dasync(address, f(args));
///     x = expression;   x += expression;   x -= expression;   x++;   x--;
/// ```
fn parse_identifier_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let target = parse_identifier(tokens)?;

    let statement = match peek_kind(tokens) {
        TokenKind::RoundOpen => Statement::Call(parse_call_arguments(tokens, &target)?),
        TokenKind::Assign => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            match lookahead.peek().map(|token| token.kind) {
                Some(TokenKind::Readln) => parse_read(tokens, target)?,
                Some(TokenKind::Async) => parse_async(tokens, target)?,
                Some(TokenKind::DAsync) => parse_dasync(tokens, target)?,
                _ => Statement::Assignment(parse_assign_tail(tokens, target)?),
            }
        },
        _ => Statement::Assignment(parse_assign_tail(tokens, target)?),
    };

    expect(tokens, TokenKind::Semicolon, "';' after statement")?;
    Ok(statement)
}

/// Parses `= readln()` after the target.
fn parse_read<'a, I>(tokens: &mut Peekable<I>, target: Token) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::Assign, "'='")?;
    let token = expect(tokens, TokenKind::Readln, "'readln'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after readln")?;
    expect(tokens, TokenKind::RoundClose, "')': readln takes no arguments")?;
    Ok(Statement::Read { target, token })
}

/// Parses `= async(expression)` after the target.
fn parse_async<'a, I>(tokens: &mut Peekable<I>, target: Token) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::Assign, "'='")?;
    let token = expect(tokens, TokenKind::Async, "'async'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after async")?;
    let expr = parse_expression(tokens)?;
    expect(tokens, TokenKind::RoundClose, "')' after the async expression")?;
    Ok(Statement::Async { target, expr, token })
}

/// Parses `= dasync(address, callee(args))` after the target.
fn parse_dasync<'a, I>(tokens: &mut Peekable<I>, target: Token) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::Assign, "'='")?;
    let token = expect(tokens, TokenKind::DAsync, "'dasync'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after dasync")?;
    let url = parse_identifier(tokens)?;
    expect(tokens, TokenKind::Comma, "',' after the remote address")?;
    let callee = parse_identifier(tokens)?;
    let call = parse_call_arguments(tokens, &callee)?;
    expect(tokens, TokenKind::RoundClose, "')' after the remote call")?;
    Ok(Statement::DAsync { target,
                           url,
                           call,
                           token })
}

/// Parses the assignment operator and value after the target.
///
/// Compound forms are desugared: `x += e` becomes `x = x + e`, `x -= e`
/// becomes `x = x - e`, `x++` becomes `x = x + 1` and `x--` becomes
/// `x = x - 1`.
///
/// # Errors
/// Returns `InvalidStatement` when the token after the target is not an
/// assignment operator.
fn parse_assign_tail<'a, I>(tokens: &mut Peekable<I>, target: Token) -> ParseResult<Assign>
    where I: Iterator<Item = &'a Token> + Clone
{
    let op = next_token(tokens)?;
    let value = match op.kind {
        TokenKind::Assign => parse_expression(tokens)?,
        TokenKind::AssignPlus => {
            let rhs = parse_expression(tokens)?;
            desugar(&target, BinaryOperator::Add, rhs, op)
        },
        TokenKind::AssignMinus => {
            let rhs = parse_expression(tokens)?;
            desugar(&target, BinaryOperator::Sub, rhs, op)
        },
        TokenKind::Increment => desugar(&target, BinaryOperator::Add, one(op), op),
        TokenKind::Decrement => desugar(&target, BinaryOperator::Sub, one(op), op),
        _ => return Err(ParseError::InvalidStatement { found: op.clone() }),
    };
    Ok(Assign { target, value })
}

fn one(origin: &Token) -> Expr {
    Expr::Constant { value: Literal::Int(1),
                     token: Token::synthetic(TokenKind::Number, "1", origin), }
}

/// Builds `target op rhs`, positioned at the compound operator.
fn desugar(target: &Token, op: BinaryOperator, rhs: Expr, origin: &Token) -> Expr {
    let kind = if op == BinaryOperator::Add { TokenKind::Plus } else { TokenKind::Minus };
    Expr::Binary { left: Box::new(Expr::Variable { token: target.clone() }),
                   op,
                   right: Box::new(rhs),
                   token: Token::synthetic(kind, &op.to_string(), origin) }
}

/// Parses `(condition)` for `if` and `while`.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>, keyword: &str) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::RoundOpen, &format!("'(' after {keyword}"))?;
    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::RoundClose, "')' after the condition")?;
    Ok(condition)
}

/// Parses an `if` statement with an optional `else` block.
///
/// Grammar: `if := "if" "(" expression ")" block ["else" block]`
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, TokenKind::If, "'if'")?.clone();
    let condition = parse_condition(tokens, "if")?;
    let then_branch = parse_block(tokens, BlockKind::Plain)?;
    let else_branch = match accept(tokens, TokenKind::Else) {
        Some(_) => Some(parse_block(tokens, BlockKind::Plain)?),
        None => None,
    };
    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       token })
}

/// Parses a `while` loop.
///
/// Grammar: `while := "while" "(" expression ")" block`
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, TokenKind::While, "'while'")?.clone();
    let condition = parse_condition(tokens, "while")?;
    let body = parse_block(tokens, BlockKind::Plain)?;
    Ok(Statement::While { condition, body, token })
}

/// Parses a `for` loop.
///
/// Grammar: `for := "for" "(" IDE "=" expression ";" expression ";" IDE
/// assign_tail ")" block`
///
/// The step accepts every assignment form, so `i++` and `i += 2` work.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, TokenKind::For, "'for'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after for")?;

    let target = parse_identifier(tokens)?;
    expect(tokens, TokenKind::Assign, "'=' in the for initializer")?;
    let init = Assign { target,
                        value: parse_expression(tokens)? };
    expect(tokens, TokenKind::Semicolon, "';' after the for initializer")?;

    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::Semicolon, "';' after the for condition")?;

    let target = parse_identifier(tokens)?;
    let step = parse_assign_tail(tokens, target)?;
    expect(tokens, TokenKind::RoundClose, "')' after the for step")?;

    let body = parse_block(tokens, BlockKind::Plain)?;
    Ok(Statement::For { init,
                        condition,
                        step,
                        body,
                        token })
}

/// Parses a `return` statement.
///
/// Grammar: `return := "return" (anonymous_function | expression) ";"`
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, TokenKind::Return, "'return'")?.clone();
    let value = if peek_kind(tokens) == TokenKind::DeclFunc {
        ReturnValue::Function(Rc::new(parse_anonymous_function(tokens)?))
    } else {
        ReturnValue::Expr(parse_expression(tokens)?)
    };
    expect(tokens, TokenKind::Semicolon, "';' after return")?;
    Ok(Statement::Return { value, token })
}

/// Parses a `println` statement with at least one value.
///
/// Grammar: `println := "println" "(" expression ("," expression)* ")" ";"`
fn parse_println<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = expect(tokens, TokenKind::Println, "'println'")?.clone();
    expect(tokens, TokenKind::RoundOpen, "'(' after println")?;
    let values = parse_comma_separated(tokens, parse_expression, TokenKind::RoundClose, false)?;
    expect(tokens, TokenKind::Semicolon, "';' after println")?;
    Ok(Statement::Print { values, token })
}
