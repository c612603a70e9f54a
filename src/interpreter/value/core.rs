use std::{fmt, rc::Rc};

use crate::{
    ast::{FunctionDef, Literal},
    interpreter::{
        environment::Env,
        value::{types::Type, url::UrlValue},
    },
};

/// The data a value holds at run time.
#[derive(Clone)]
pub enum Payload {
    Int(i32),
    Bool(bool),
    Char(char),
    Str(Rc<str>),
    Url(Rc<UrlValue>),
    Function(Closure),
}

/// A function value: its definition and the environment it was created in.
#[derive(Clone)]
pub struct Closure {
    pub def: Rc<FunctionDef>,
    pub env: Env,
}

/// A typed value.
///
/// The checker works with values whose payload is only known for literals;
/// the interpreter always fills the payload, except for variables declared
/// without an initializer, which stay uninitialized until assigned.
#[derive(Clone)]
pub struct Value {
    ty:      Type,
    payload: Option<Payload>,
}

impl Value {
    /// A value of type `ty` without payload.
    #[must_use]
    pub const fn uninit(ty: Type) -> Self {
        Self { ty, payload: None }
    }

    #[must_use]
    pub const fn int(n: i32) -> Self {
        Self { ty:      Type::INT,
               payload: Some(Payload::Int(n)), }
    }

    #[must_use]
    pub const fn bool(b: bool) -> Self {
        Self { ty:      Type::BOOL,
               payload: Some(Payload::Bool(b)), }
    }

    #[must_use]
    pub const fn char(c: char) -> Self {
        Self { ty:      Type::CHAR,
               payload: Some(Payload::Char(c)), }
    }

    #[must_use]
    pub fn string(s: &str) -> Self {
        Self { ty:      Type::STRING,
               payload: Some(Payload::Str(Rc::from(s))), }
    }

    #[must_use]
    pub fn url(url: UrlValue) -> Self {
        Self { ty:      Type::URL,
               payload: Some(Payload::Url(Rc::new(url))), }
    }

    /// A function value closing over `env`.
    #[must_use]
    pub fn closure(def: Rc<FunctionDef>, env: Env) -> Self {
        Self { ty:      def.ty(),
               payload: Some(Payload::Function(Closure { def, env })), }
    }

    #[must_use]
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => Self::int(*n),
            Literal::Bool(b) => Self::bool(*b),
            Literal::Char(c) => Self::char(*c),
            Literal::Str(s) => Self::string(s),
            Literal::Url(url) => Self::url(url.clone()),
        }
    }

    #[must_use]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.payload.is_some()
    }

    /// Returns the url payload, if this value holds one.
    #[must_use]
    pub fn as_url(&self) -> Option<&UrlValue> {
        match &self.payload {
            Some(Payload::Url(url)) => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            None => write!(f, "<uninitialized {}>", self.ty),
            Some(Payload::Int(n)) => write!(f, "{n}"),
            Some(Payload::Bool(b)) => write!(f, "{b}"),
            Some(Payload::Char(c)) => write!(f, "{c}"),
            Some(Payload::Str(s)) => write!(f, "{s}"),
            Some(Payload::Url(url)) => write!(f, "{url}"),
            Some(Payload::Function(closure)) => write!(f, "{}", closure.def.signature()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            None => write!(f, "Value({}, uninitialized)", self.ty),
            Some(_) => write!(f, "Value({}, {self})", self.ty),
        }
    }
}
