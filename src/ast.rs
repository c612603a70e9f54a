use std::{fmt, rc::Rc};

use crate::interpreter::{
    lexer::Token,
    value::{
        types::{Scalar, Type},
        url::UrlValue,
    },
};

/// Represents a literal value in the language.
///
/// `Literal` covers the constants that can appear directly in source code.
/// Quotes are already stripped from character and string literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A 32-bit signed integer literal.
    Int(i32),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A character literal such as `'a'`.
    Char(char),
    /// A string literal such as `"hello"`.
    Str(String),
    /// A remote object address such as `tcp://localhost:9090/adder`.
    Url(UrlValue),
}

impl Literal {
    #[must_use]
    pub const fn ty(&self) -> Type {
        match self {
            Self::Int(_) => Type::INT,
            Self::Bool(_) => Type::BOOL,
            Self::Char(_) => Type::CHAR,
            Self::Str(_) => Type::STRING,
            Self::Url(_) => Type::URL,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Neg => "-",
                        Self::Not => "!",
                    })
    }
}

/// Binary operators, from weakest to strongest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// `==`, `!=`, `>`, `>=`, `<` and `<=`.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Greater
                 | Self::GreaterEqual
                 | Self::Less
                 | Self::LessEqual)
    }

    /// `+`, `-`, `*` and `/`.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        f.write_str(symbol)
    }
}

/// A function call: `callee(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee:    Token,
    pub arguments: Vec<Expr>,
}

/// Represents an expression node in the AST.
///
/// Every variant keeps the token it was built from, so later phases can report
/// errors at the right place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal constant.
    Constant {
        /// The value of the literal.
        value: Literal,
        /// The literal token.
        token: Token,
    },
    /// A variable reference; the name is the token text.
    Variable {
        /// The identifier token.
        token: Token,
    },
    /// A unary operation such as `-x` or `!b`.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
        /// The operator token.
        token:   Token,
    },
    /// A binary operation such as `a + b`.
    Binary {
        /// The left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// The right operand.
        right: Box<Self>,
        /// The operator token.
        token: Token,
    },
    /// A call used as a value.
    Call(Call),
}

impl Expr {
    /// The token this expression was built from.
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::Constant { token, .. }
            | Self::Variable { token }
            | Self::Unary { token, .. }
            | Self::Binary { token, .. } => token,
            Self::Call(call) => &call.callee,
        }
    }
}

/// A formal parameter: a name and a scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Token,
    pub ty:   Scalar,
}

/// A function definition, named or anonymous.
///
/// Anonymous functions use their `func` token as name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name:      Token,
    pub params:    Vec<Param>,
    pub returns:   Option<Type>,
    pub body:      Block,
    pub anonymous: bool,
}

impl FunctionDef {
    /// The function type of this definition.
    #[must_use]
    pub fn ty(&self) -> Type {
        Type::function(self.params.iter().map(|p| p.ty).collect(), self.returns.clone())
    }

    /// A readable signature such as `add(int a, int b) int`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self.params
                         .iter()
                         .map(|p| format!("{} {}", p.ty, p.name.text))
                         .collect::<Vec<_>>()
                         .join(", ");
        match &self.returns {
            Some(returns) => format!("{}({params}) {returns}", self.name.text),
            None => format!("{}({params})", self.name.text),
        }
    }
}

/// Which block of the program a [`Block`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The outermost block, holding the program-level declarations.
    Program,
    /// The body of `Main`.
    Main,
    /// Any other block.
    Plain,
}

/// A sequence of statements with its own scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind:       BlockKind,
    /// The opening brace; the program block has none.
    pub token:      Option<Token>,
    pub statements: Vec<Statement>,
}

/// `target = value`, also the desugared form of `+=`, `-=`, `++` and `--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub target: Token,
    pub value:  Expr,
}

/// What a `return` statement hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    Expr(Expr),
    /// An anonymous function, `return func(...) ... { ... };`.
    Function(Rc<FunctionDef>),
}

/// Represents a statement node in the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `var name type [= init];`
    Declaration {
        /// The declared identifier.
        name: Token,
        /// The declared type.
        ty:   Type,
        /// The optional initializer.
        init: Option<Expr>,
    },
    /// `target = value;`
    Assignment(Assign),
    /// A nested `{ ... }` block.
    Block(Block),
    /// `if (condition) { ... } [else { ... }]`
    If {
        /// The condition.
        condition:   Expr,
        /// Executed when the condition holds.
        then_branch: Block,
        /// Executed otherwise.
        else_branch: Option<Block>,
        /// The `if` token.
        token:       Token,
    },
    /// `while (condition) { ... }`
    While {
        /// The condition.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// The `while` token.
        token:     Token,
    },
    /// `for (init; condition; step) { ... }`
    For {
        /// Runs once before the loop.
        init:      Assign,
        /// Checked before each iteration.
        condition: Expr,
        /// Runs after each iteration.
        step:      Assign,
        /// The loop body.
        body:      Block,
        /// The `for` token.
        token:     Token,
    },
    /// `return value;`
    Return {
        /// The returned value.
        value: ReturnValue,
        /// The `return` token.
        token: Token,
    },
    /// `println(values, ...);`
    Print {
        /// The printed expressions.
        values: Vec<Expr>,
        /// The `println` token.
        token:  Token,
    },
    /// `target = readln();`
    Read {
        /// The assigned variable.
        target: Token,
        /// The `readln` token.
        token:  Token,
    },
    /// `target = async(expr);`
    Async {
        /// The assigned variable.
        target: Token,
        /// The expression computed in the background.
        expr:   Expr,
        /// The `async` token.
        token:  Token,
    },
    /// `target = dasync(url, call);`
    DAsync {
        /// The assigned variable.
        target: Token,
        /// The variable holding the remote address.
        url:    Token,
        /// The remote call.
        call:   Call,
        /// The `dasync` token.
        token:  Token,
    },
    /// A named function definition.
    Function(Rc<FunctionDef>),
    /// A call whose result, if any, is discarded.
    Call(Call),
}

/// A parsed program: its declarations and the `Main` function, all inside the
/// program block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The `Main` token of the entry point.
    pub main: Token,
    pub root: Block,
}

impl Program {
    /// Returns the program-level function named `name`.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Rc<FunctionDef>> {
        self.root.statements.iter().find_map(|statement| match statement {
                                       Statement::Function(def) if def.name.text == name => {
                                           Some(def)
                                       },
                                       _ => None,
                                   })
    }

    /// Renders the tree as an indented outline, one node per line.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        outline_block(&mut out, "Program", &self.root, 0);
        out
    }
}

fn outline_line(out: &mut String, depth: usize, title: &str) {
    out.push_str(&format!("{}{title}\n", "  ".repeat(depth)));
}

fn outline_block(out: &mut String, title: &str, block: &Block, depth: usize) {
    outline_line(out, depth, title);
    for statement in &block.statements {
        outline_statement(out, statement, depth + 1);
    }
}

fn outline_function(out: &mut String, def: &FunctionDef, depth: usize) {
    let title = if def.anonymous {
        format!("Function (anonymous) {}", def.ty())
    } else {
        format!("Function {} {}", def.name.text, def.ty())
    };
    outline_line(out, depth, &title);
    outline_block(out, "Block", &def.body, depth + 1);
}

fn outline_statement(out: &mut String, statement: &Statement, depth: usize) {
    match statement {
        Statement::Declaration { name, ty, init } => {
            outline_line(out, depth, &format!("Declaration {}: {ty}", name.text));
            if let Some(init) = init {
                outline_expr(out, init, depth + 1);
            }
        },
        Statement::Assignment(assign) => outline_assign(out, assign, depth),
        Statement::Block(block) => outline_block(out, "Block", block, depth),
        Statement::If { condition,
                        then_branch,
                        else_branch,
                        .. } => {
            outline_line(out, depth, "If");
            outline_expr(out, condition, depth + 1);
            outline_block(out, "Then", then_branch, depth + 1);
            if let Some(else_branch) = else_branch {
                outline_block(out, "Else", else_branch, depth + 1);
            }
        },
        Statement::While { condition, body, .. } => {
            outline_line(out, depth, "While");
            outline_expr(out, condition, depth + 1);
            outline_block(out, "Block", body, depth + 1);
        },
        Statement::For { init,
                         condition,
                         step,
                         body,
                         .. } => {
            outline_line(out, depth, "For");
            outline_assign(out, init, depth + 1);
            outline_expr(out, condition, depth + 1);
            outline_assign(out, step, depth + 1);
            outline_block(out, "Block", body, depth + 1);
        },
        Statement::Return { value, .. } => {
            outline_line(out, depth, "Return");
            match value {
                ReturnValue::Expr(expr) => outline_expr(out, expr, depth + 1),
                ReturnValue::Function(def) => outline_function(out, def, depth + 1),
            }
        },
        Statement::Print { values, .. } => {
            outline_line(out, depth, "Println");
            for value in values {
                outline_expr(out, value, depth + 1);
            }
        },
        Statement::Read { target, .. } => {
            outline_line(out, depth, &format!("Readln {}", target.text));
        },
        Statement::Async { target, expr, .. } => {
            outline_line(out, depth, &format!("Async {}", target.text));
            outline_expr(out, expr, depth + 1);
        },
        Statement::DAsync { target, url, call, .. } => {
            outline_line(out, depth, &format!("DAsync {} via {}", target.text, url.text));
            outline_call(out, call, depth + 1);
        },
        Statement::Function(def) => outline_function(out, def, depth),
        Statement::Call(call) => outline_call(out, call, depth),
    }
}

fn outline_assign(out: &mut String, assign: &Assign, depth: usize) {
    outline_line(out, depth, &format!("Assign {}", assign.target.text));
    outline_expr(out, &assign.value, depth + 1);
}

fn outline_call(out: &mut String, call: &Call, depth: usize) {
    outline_line(out, depth, &format!("Call {}", call.callee.text));
    for argument in &call.arguments {
        outline_expr(out, argument, depth + 1);
    }
}

fn outline_expr(out: &mut String, expr: &Expr, depth: usize) {
    match expr {
        Expr::Constant { token, value } => {
            outline_line(out, depth, &format!("Constant {} {}", value.ty(), token.text));
        },
        Expr::Variable { token } => outline_line(out, depth, &format!("Var {}", token.text)),
        Expr::Unary { op, operand, .. } => {
            outline_line(out, depth, &format!("Unary {op}"));
            outline_expr(out, operand, depth + 1);
        },
        Expr::Binary { left, op, right, .. } => {
            outline_line(out, depth, &format!("Binary {op}"));
            outline_expr(out, left, depth + 1);
            outline_expr(out, right, depth + 1);
        },
        Expr::Call(call) => outline_call(out, call, depth),
    }
}
