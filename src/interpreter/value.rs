/// Runtime values.
///
/// Defines `Value`, a type paired with an optional payload, and the closures
/// that function values carry.
pub mod core;
/// Static types.
///
/// Defines the scalar kinds and the recursive function type shared by the
/// checker, the interpreter and the code generator.
pub mod types;
/// Remote object addresses.
///
/// Parsing and display of `tcp://host:port/object` urls.
pub mod url;
