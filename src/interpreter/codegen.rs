/// Generator state and the generated units.
///
/// Defines `Generator`, `GeneratedProgram`, the shared `using` preamble and
/// indentation helpers.
pub mod core;

/// Expression translation, including the waits inserted in front of reads of
/// variables assigned in the background.
pub mod expression;

/// Statement translation.
///
/// Blocks, declarations, control flow, functions and delegates, input
/// conversion and `async` tasks.
pub mod statement;

/// The `dasync` backend: client tasks and remote-object server units.
pub mod remote;

/// How language types map to C# types, defaults and conversions.
pub mod host_type;

/// Compilation units and the external compiler interface.
pub mod toolchain;
