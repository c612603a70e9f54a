use std::fmt;

/// The primitive types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    Bool,
    Char,
    String,
    Url,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Int => "int",
                        Self::Bool => "bool",
                        Self::Char => "char",
                        Self::String => "string",
                        Self::Url => "url",
                    })
    }
}

/// The type of a value.
///
/// Function types nest through their return type, so a function returning a
/// function is `Function { returns: Some(Function { .. }) }`. A missing return
/// type means the function returns nothing. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Scalar(Scalar),
    Function {
        params:  Vec<Scalar>,
        returns: Option<Box<Type>>,
    },
}

impl Type {
    pub const BOOL: Self = Self::Scalar(Scalar::Bool);
    pub const CHAR: Self = Self::Scalar(Scalar::Char);
    pub const INT: Self = Self::Scalar(Scalar::Int);
    pub const STRING: Self = Self::Scalar(Scalar::String);
    pub const URL: Self = Self::Scalar(Scalar::Url);

    /// Builds a function type.
    #[must_use]
    pub fn function(params: Vec<Scalar>, returns: Option<Self>) -> Self {
        Self::Function { params,
                         returns: returns.map(Box::new) }
    }

    /// Returns the scalar kind, or `None` for function types.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) => Some(*s),
            Self::Function { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }
}

impl From<Scalar> for Type {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Function { params, returns } => {
                write!(f, "fun(")?;
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")?;
                if let Some(returns) = returns {
                    write!(f, " {returns}")?;
                }
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_types_compare_structurally() {
        let adder = Type::function(vec![Scalar::Int], Some(Type::INT));
        let maker = Type::function(vec![], Some(adder.clone()));
        assert_eq!(maker, Type::function(vec![], Some(Type::function(vec![Scalar::Int], Some(Type::INT)))));
        assert_ne!(maker, Type::function(vec![], Some(Type::function(vec![Scalar::Int], None))));
        assert_ne!(adder, Type::function(vec![Scalar::Bool], Some(Type::INT)));
        assert_ne!(adder, Type::INT);
    }

    #[test]
    fn types_display_like_source_syntax() {
        let nested = Type::function(vec![Scalar::Int, Scalar::Bool],
                                    Some(Type::function(vec![], Some(Type::STRING))));
        assert_eq!(nested.to_string(), "fun(int, bool) fun() string");
        assert_eq!(Type::function(vec![Scalar::Char], None).to_string(), "fun(char)");
    }
}
