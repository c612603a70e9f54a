use crate::{
    ast::{Call, Expr, Literal},
    interpreter::codegen::{
        core::{Generator, tabs},
        host_type::escape,
    },
};

impl Generator<'_, '_> {
    /// Appends the C# form of `expr` to `out`.
    ///
    /// Operations are fully parenthesized. A read of a variable assigned by a
    /// background task first inserts `Task_x.Wait();` as a line of its own,
    /// indented by `tab`, in front of the line being written.
    pub(super) fn gen_expr(&self, out: &mut String, expr: &Expr, tab: usize) {
        match expr {
            Expr::Constant { value, .. } => match value {
                Literal::Int(n) => {
                    out.push_str(&n.to_string());
                },
                Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                Literal::Char(c) => {
                    out.push_str(&format!("'{}'", escape(&c.to_string())));
                },
                Literal::Str(s) => {
                    out.push_str(&format!("\"{}\"", escape(s)));
                },
                Literal::Url(url) => {
                    out.push_str(&format!("\"{url}\""));
                },
            },
            Expr::Variable { token } => {
                if self.annotations.async_reads.contains(&token.offset) {
                    let line_start = out.rfind('\n').map_or(0, |i| i + 1);
                    out.insert_str(line_start, &format!("{}Task_{}.Wait();\n", tabs(tab), token.text));
                }
                out.push_str(&token.text);
            },
            Expr::Unary { op, operand, .. } => {
                out.push_str(&format!("({op}"));
                self.gen_expr(out, operand, tab);
                out.push(')');
            },
            Expr::Binary { left, op, right, .. } => {
                out.push('(');
                self.gen_expr(out, left, tab);
                out.push_str(&format!(" {op} "));
                self.gen_expr(out, right, tab);
                out.push(')');
            },
            Expr::Call(call) => self.gen_call(out, call, tab),
        }
    }

    /// Appends `callee(arg,arg..)` without a terminator.
    pub(super) fn gen_call(&self, out: &mut String, call: &Call, tab: usize) {
        out.push_str(&call.callee.text);
        out.push('(');
        for (index, argument) in call.arguments.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.gen_expr(out, argument, tab);
        }
        out.push(')');
    }
}
