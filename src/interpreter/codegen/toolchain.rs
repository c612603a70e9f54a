use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::debug;

/// One generated C# source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// The file name without extension.
    pub name:   String,
    pub source: String,
}

/// What a unit is built into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A `.dll` other units can reference.
    Library,
    /// A runnable `.exe`.
    Executable,
}

/// An external C# compiler.
///
/// Builds report failure as the compiler's own output; the generator records
/// it as a diagnostic and carries on.
pub trait Toolchain {
    /// Builds `unit` as `kind`, linking against the libraries named in
    /// `references`.
    ///
    /// # Errors
    /// Returns the compiler output when the build fails.
    fn build(&mut self, unit: &CompilationUnit, kind: UnitKind, references: &[String]) -> Result<(), String>;
}

/// A toolchain running a `csc`-compatible compiler in a working directory.
///
/// Each unit is written to `<dir>/<name>.cs` before the compiler runs.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    compiler: PathBuf,
    dir:      PathBuf,
}

impl CommandToolchain {
    #[must_use]
    pub fn new(compiler: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        Self { compiler: compiler.into(),
               dir:      dir.into(), }
    }
}

/// The compiler arguments for a build.
#[must_use]
pub fn compiler_arguments(unit: &CompilationUnit,
                          kind: UnitKind,
                          references: &[String],
                          dir: &Path)
                          -> Vec<String> {
    let source = format!("{}.cs", unit.name);
    match kind {
        UnitKind::Library => vec!["/t:library".to_string(), source],
        UnitKind::Executable => {
            let mut args = Vec::new();
            if !references.is_empty() {
                args.push(format!("/lib:{}", dir.display()));
                args.extend(references.iter().map(|r| format!("/r:{r}.dll")));
            }
            args.push("/t:exe".to_string());
            args.push(format!("/out:{}.exe", unit.name));
            args.push(source);
            args
        },
    }
}

impl Toolchain for CommandToolchain {
    fn build(&mut self, unit: &CompilationUnit, kind: UnitKind, references: &[String]) -> Result<(), String> {
        let path = self.dir.join(format!("{}.cs", unit.name));
        fs::write(&path, &unit.source).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

        let args = compiler_arguments(unit, kind, references, &self.dir);
        debug!(compiler = %self.compiler.display(), ?args, "building unit");
        let output = Command::new(&self.compiler).args(&args)
                                                 .current_dir(&self.dir)
                                                 .output()
                                                 .map_err(|e| {
                                                     format!("cannot run {}: {e}", self.compiler.display())
                                                 })?;
        if output.status.success() {
            Ok(())
        } else {
            let mut message = String::from_utf8_lossy(&output.stdout).into_owned();
            message.push_str(&String::from_utf8_lossy(&output.stderr));
            Err(message.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> CompilationUnit {
        CompilationUnit { name:   "ADD_Server".to_string(),
                          source: String::new(), }
    }

    #[test]
    fn library_build_has_no_references() {
        let args = compiler_arguments(&unit(), UnitKind::Library, &["X".to_string()], Path::new("out"));
        assert_eq!(args, ["/t:library", "ADD_Server.cs"]);
    }

    #[test]
    fn executable_links_references_from_dir() {
        let args = compiler_arguments(&unit(), UnitKind::Executable, &["Lib".to_string()], Path::new("out"));
        assert_eq!(args,
                   ["/lib:out", "/r:Lib.dll", "/t:exe", "/out:ADD_Server.exe", "ADD_Server.cs"]);
    }
}
