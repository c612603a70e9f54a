use crate::interpreter::value::types::{Scalar, Type};

/// Lowers a scalar type to its C# name. Urls are plain strings.
#[must_use]
pub const fn lower_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int => "int",
        Scalar::Bool => "bool",
        Scalar::Char => "char",
        Scalar::String | Scalar::Url => "string",
    }
}

/// Lowers an optional type to C#.
///
/// A missing type is `void`. Function types become delegates: `Func<P.., R>`
/// when they return a value, `Action<P..>` or `Action` otherwise.
///
/// # Example
/// ```
/// use fwap::interpreter::{
///     codegen::host_type::lower_type,
///     value::types::{Scalar, Type},
/// };
///
/// let adder = Type::function(vec![Scalar::Int, Scalar::Int], Some(Type::INT));
/// assert_eq!(lower_type(Some(&adder)), "Func<int,int,int>");
/// assert_eq!(lower_type(None), "void");
/// ```
#[must_use]
pub fn lower_type(ty: Option<&Type>) -> String {
    match ty {
        None => "void".to_string(),
        Some(Type::Scalar(scalar)) => lower_scalar(*scalar).to_string(),
        Some(Type::Function { params, returns }) => {
            let mut parts: Vec<String> = params.iter().map(|p| lower_scalar(*p).to_string()).collect();
            match returns {
                Some(returns) => {
                    parts.push(lower_type(Some(returns)));
                    format!("Func<{}>", parts.join(","))
                },
                None if parts.is_empty() => "Action".to_string(),
                None => format!("Action<{}>", parts.join(",")),
            }
        },
    }
}

/// The C# literal a variable of type `ty` starts with before a background
/// task or an input conversion assigns it.
#[must_use]
pub const fn default_value(ty: &Type) -> &'static str {
    match ty {
        Type::Scalar(Scalar::Int) => "0",
        Type::Scalar(Scalar::Bool) => "false",
        Type::Scalar(Scalar::Char) => "'0'",
        Type::Scalar(Scalar::String | Scalar::Url) => "\"\"",
        Type::Function { .. } => "null",
    }
}

/// The C# expression converting the string variable `input` to `ty`.
#[must_use]
pub fn conversion(ty: &Type, input: &str) -> String {
    match ty.as_scalar() {
        Some(Scalar::Int) => format!("Convert.ToInt32({input})"),
        Some(Scalar::Bool) => format!("Convert.ToBoolean({input})"),
        Some(Scalar::Char) => format!("Convert.ToChar({input})"),
        Some(Scalar::String | Scalar::Url) | None => input.to_string(),
    }
}

/// Escapes text for a C# string or char literal.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_types_lower_to_delegates() {
        let maker = Type::function(vec![], Some(Type::function(vec![Scalar::Int], Some(Type::INT))));
        assert_eq!(lower_type(Some(&maker)), "Func<Func<int,int>>");
        assert_eq!(lower_type(Some(&Type::function(vec![Scalar::Char, Scalar::Url], None))),
                   "Action<char,string>");
        assert_eq!(lower_type(Some(&Type::function(vec![], None))), "Action");
        assert_eq!(lower_type(Some(&Type::URL)), "string");
    }

    #[test]
    fn defaults_and_conversions() {
        assert_eq!(default_value(&Type::CHAR), "'0'");
        assert_eq!(default_value(&Type::URL), "\"\"");
        assert_eq!(conversion(&Type::BOOL, "input_0"), "Convert.ToBoolean(input_0)");
        assert_eq!(conversion(&Type::STRING, "input_0"), "input_0");
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
