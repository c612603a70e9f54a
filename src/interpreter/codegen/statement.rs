use std::collections::HashSet;

use crate::{
    ast::{Assign, Block, BlockKind, Expr, FunctionDef, ReturnValue, Statement},
    error::RuntimeError,
    interpreter::{
        codegen::{
            core::{GenResult, Generator, PREAMBLE, tabs},
            host_type::{conversion, default_value, lower_scalar, lower_type},
        },
        lexer::Token,
        value::types::Type,
    },
};

impl Generator<'_, '_> {
    /// Appends a block: its braces at `tab`, its statements one level deeper.
    ///
    /// The program block is preceded by the `using` lines and wrapped in
    /// `class Program`; the body of `Main` ends by waiting for a key press.
    /// The closing brace is not followed by a newline.
    pub(super) fn gen_block(&mut self, out: &mut String, block: &Block, tab: usize) -> GenResult<()> {
        if block.kind == BlockKind::Program {
            out.push_str(PREAMBLE);
            out.push_str("\nclass Program\n");
        }
        out.push_str(&format!("{}{{\n", tabs(tab)));
        self.task_scopes.push(HashSet::new());
        for statement in &block.statements {
            self.gen_statement(out, statement, tab + 1)?;
            out.push('\n');
        }
        self.task_scopes.pop();
        if block.kind == BlockKind::Main {
            out.push_str(&format!("{}Console.ReadLine();\n", tabs(tab + 1)));
        }
        out.push_str(&format!("{}}}", tabs(tab)));
        Ok(())
    }

    /// Appends one statement at `tab`, without a trailing newline.
    pub(super) fn gen_statement(&mut self,
                                out: &mut String,
                                statement: &Statement,
                                tab: usize)
                                -> GenResult<()> {
        match statement {
            Statement::Declaration { name, ty, init } => {
                out.push_str(&tabs(tab));
                if tab == 1 {
                    out.push_str(self.modifier);
                }
                out.push_str(&format!("{} {}", lower_type(Some(ty)), name.text));
                if let Some(init) = init {
                    out.push_str(" = ");
                    self.gen_expr(out, init, tab);
                }
                out.push(';');
            },
            Statement::Assignment(assign) => {
                out.push_str(&tabs(tab));
                self.gen_assign(out, assign, tab);
            },
            Statement::Block(block) => self.gen_block(out, block, tab)?,
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                self.gen_header(out, "if", condition, tab);
                self.gen_block(out, then_branch, tab)?;
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!("\n{}else\n", tabs(tab)));
                    self.gen_block(out, else_branch, tab)?;
                }
            },
            Statement::While { condition, body, .. } => {
                self.gen_header(out, "while", condition, tab);
                self.gen_block(out, body, tab)?;
            },
            Statement::For { init,
                             condition,
                             step,
                             body,
                             .. } => {
                out.push_str(&format!("{}for (", tabs(tab)));
                self.gen_assign(out, init, tab);
                out.pop();
                out.push_str(" ; ");
                self.gen_expr(out, condition, tab);
                out.push_str(" ; ");
                self.gen_assign(out, step, tab);
                out.pop();
                out.push_str(")\n");
                self.gen_block(out, body, tab)?;
            },
            Statement::Return { value, .. } => {
                out.push_str(&format!("{}return ", tabs(tab)));
                match value {
                    ReturnValue::Expr(expr) => self.gen_expr(out, expr, tab),
                    ReturnValue::Function(def) => self.gen_function(out, def, tab)?,
                }
                out.push(';');
            },
            Statement::Print { values, .. } => {
                for value in values {
                    out.push_str(&format!("{}Console.Write(", tabs(tab)));
                    self.gen_expr(out, value, tab);
                    out.push_str(");\n");
                }
                out.push_str(&format!("{}Console.WriteLine();", tabs(tab)));
            },
            Statement::Read { target, token } => {
                let ty = self.target_type(token, "readln")?.clone();
                let input = format!("input_{}", self.inputs);
                self.inputs += 1;

                let indent = tabs(tab);
                out.push_str(&format!("{indent}{} = {};\n", target.text, default_value(&ty)));
                out.push_str(&format!("{indent}string {input} = Console.ReadLine();\n"));
                out.push_str(&format!("{indent}try {{ {} = {}; }}\n",
                                      target.text,
                                      conversion(&ty, &input)));
                out.push_str(&format!("{indent}catch (FormatException) {{ Console.WriteLine(\"Cannot convert the text \\\"\" + {input} + \"\\\" into a value of type {ty}.\"); }}"));
            },
            Statement::Async { target, expr, token } => {
                self.gen_task_prologue(out, target, token, "async", tab)?;
                let indent = tabs(tab);
                let task = self.task_declaration(target);
                out.push_str(&format!("{indent}{task} = new Task(delegate() {{ {} = ", target.text));
                self.gen_expr(out, expr, tab);
                out.push_str("; });\n");
                out.push_str(&format!("{indent}Task_{}.Start();", target.text));
            },
            Statement::DAsync { target,
                                url,
                                call,
                                token, } => self.gen_dasync(out, target, url, call, token, tab)?,
            Statement::Function(def) => self.gen_function(out, def, tab)?,
            Statement::Call(call) => {
                out.push_str(&tabs(tab));
                self.gen_call(out, call, tab);
                out.push(';');
            },
        }
        Ok(())
    }

    /// Appends `target = value;` without indentation.
    fn gen_assign(&self, out: &mut String, assign: &Assign, tab: usize) {
        out.push_str(&format!("{} = ", assign.target.text));
        self.gen_expr(out, &assign.value, tab);
        out.push(';');
    }

    /// Appends `keyword (condition)` and a newline.
    fn gen_header(&self, out: &mut String, keyword: &str, condition: &Expr, tab: usize) {
        out.push_str(&format!("{}{keyword} (", tabs(tab)));
        self.gen_expr(out, condition, tab);
        out.push_str(")\n");
    }

    /// Appends a function definition.
    ///
    /// Named functions become methods, `static` or `public` at program level.
    /// Anonymous ones become `delegate(...)` expressions.
    pub(super) fn gen_function(&mut self, out: &mut String, def: &FunctionDef, tab: usize) -> GenResult<()> {
        if def.anonymous {
            out.push_str("delegate(");
        } else {
            out.push_str(&tabs(tab));
            if tab == 1 {
                out.push_str(self.modifier);
            }
            out.push_str(&format!("{} {}(", lower_type(def.returns.as_ref()), def.name.text));
        }
        out.push_str(&lower_params(def));
        out.push_str(")\n");
        self.gen_block(out, &def.body, tab)
    }

    /// The left-hand side assigning the task variable of `target`: a
    /// declaration the first time the name is used in the enclosing blocks,
    /// the bare name afterwards.
    pub(super) fn task_declaration(&mut self, target: &Token) -> String {
        let name = format!("Task_{}", target.text);
        if self.task_scopes.iter().any(|scope| scope.contains(&name)) {
            return name;
        }
        if let Some(scope) = self.task_scopes.last_mut() {
            scope.insert(name.clone());
        }
        format!("Task {name}")
    }

    /// The annotated type of the target of a `readln`, `async` or `dasync`.
    pub(super) fn target_type(&self, token: &Token, construct: &'static str) -> GenResult<&Type> {
        self.annotations
            .targets
            .get(&token.offset)
            .ok_or(RuntimeError::MissingAnnotation { construct,
                                                     at: token.position() })
    }

    /// Appends `target = default;` ahead of a background task.
    ///
    /// # Errors
    /// Returns `TypeError` when the target holds a function.
    pub(super) fn gen_task_prologue(&self,
                                    out: &mut String,
                                    target: &Token,
                                    token: &Token,
                                    construct: &'static str,
                                    tab: usize)
                                    -> GenResult<()> {
        let ty = self.target_type(token, construct)?;
        if ty.is_function() {
            return Err(RuntimeError::TypeError { details: format!("'{construct}' cannot assign a value of type {ty}"),
                                                 at:      token.position(), });
        }
        out.push_str(&format!("{}{} = {};\n", tabs(tab), target.text, default_value(ty)));
        Ok(())
    }
}

/// Formal parameters as `T a,T b`.
pub(super) fn lower_params(def: &FunctionDef) -> String {
    def.params
       .iter()
       .map(|p| format!("{} {}", lower_scalar(p.ty), p.name.text))
       .collect::<Vec<_>>()
       .join(",")
}
