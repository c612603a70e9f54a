use std::collections::HashSet;

use tracing::info;

use crate::{
    ast::Program,
    error::RuntimeError,
    interpreter::{
        checker::core::Annotations,
        codegen::toolchain::{CompilationUnit, Toolchain},
    },
};

/// Result type used by the code generator.
pub type GenResult<T> = Result<T, RuntimeError>;

/// The `using` lines every generated unit starts with.
pub const PREAMBLE: &str = "using System;
using System.Threading;
using System.Threading.Tasks;
using System.Runtime.Remoting;
using System.Runtime.Remoting.Channels;
using System.Runtime.Remoting.Channels.Tcp;
";

/// Everything produced by compiling one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    /// The translated program.
    pub primary:     CompilationUnit,
    /// One remote-object server per function called through `dasync`.
    pub servers:     Vec<CompilationUnit>,
    /// Libraries the primary unit must be linked against.
    pub references:  Vec<String>,
    /// Compiler output of failed server builds.
    pub diagnostics: Vec<String>,
}

/// Translates a checked program to C#.
///
/// Output is tab-indented; `tab` parameters count tabs. Program-level members
/// are `static` in the primary unit and `public` in server units.
pub struct Generator<'a, 't> {
    pub(super) program:      &'a Program,
    pub(super) annotations:  &'a Annotations,
    pub(super) toolchain:    Option<&'t mut dyn Toolchain>,
    pub(super) modifier:     &'static str,
    pub(super) inputs:       usize,
    pub(super) task_scopes:  Vec<HashSet<String>>,
    pub(super) server_names: HashSet<String>,
    pub(super) servers:      Vec<CompilationUnit>,
    pub(super) references:   Vec<String>,
    pub(super) diagnostics:  Vec<String>,
}

impl<'a, 't> Generator<'a, 't> {
    #[must_use]
    pub fn new(program: &'a Program,
               annotations: &'a Annotations,
               toolchain: Option<&'t mut dyn Toolchain>)
               -> Self {
        Self { program,
               annotations,
               toolchain,
               modifier: "static ",
               inputs: 0,
               task_scopes: Vec::new(),
               server_names: HashSet::new(),
               servers: Vec::new(),
               references: Vec::new(),
               diagnostics: Vec::new() }
    }

    /// Generates the primary unit named `name` and every server unit it needs.
    ///
    /// Server units are built with the toolchain, if there is one, as soon as
    /// they are generated.
    ///
    /// # Errors
    /// - `TypeError` for a background assignment to a function variable.
    /// - `RemoteFunctionNotFound` and `UnknownRemoteAddress` for a `dasync`
    ///   whose server cannot be generated.
    /// - `MissingAnnotation` if the program was not checked.
    pub fn generate(mut self, name: &str) -> GenResult<GeneratedProgram> {
        let program = self.program;
        let mut out = String::new();
        self.gen_block(&mut out, &program.root, 0)?;
        out.push('\n');
        info!(unit = name, servers = self.servers.len(), "generated C# program");

        Ok(GeneratedProgram { primary:     CompilationUnit { name:   name.to_string(),
                                                             source: out, },
                              servers:     self.servers,
                              references:  self.references,
                              diagnostics: self.diagnostics, })
    }
}

/// `n` tabs.
#[must_use]
pub fn tabs(n: usize) -> String {
    "\t".repeat(n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{check_source, interpreter::codegen::toolchain::UnitKind};

    fn generate(source: &str) -> GeneratedProgram {
        let (program, annotations) = check_source(source).unwrap();
        Generator::new(&program, &annotations, None).generate("Program").unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        builds:  Vec<(String, UnitKind, Vec<String>)>,
        failing: Option<UnitKind>,
    }

    impl Toolchain for Recorder {
        fn build(&mut self, unit: &CompilationUnit, kind: UnitKind, references: &[String]) -> Result<(), String> {
            self.builds.push((unit.name.clone(), kind, references.to_vec()));
            if self.failing == Some(kind) {
                Err("error CS0246".to_string())
            } else {
                Ok(())
            }
        }
    }

    const REMOTE: &str = "var addr url = tcp://localhost:9090/adder;
func add(a int, b int) int { return a + b; }
func Main() {
    var s int;
    s = dasync(addr, add(1, 2));
    println(s);
}";

    #[test]
    fn program_layout() {
        let generated = generate("var g int = 1;\nfunc Main() {\n    var x int = 2;\n    println(x + g);\n}");
        let expected = format!("{PREAMBLE}
class Program
{{
\tstatic int g = 1;
\tstatic void Main()
\t{{
\t\tint x = 2;
\t\tConsole.Write((x + g));
\t\tConsole.WriteLine();
\t\tConsole.ReadLine();
\t}}
}}
");
        assert_eq!(generated.primary.source, expected);
        assert!(generated.servers.is_empty());
    }

    #[test]
    fn control_flow_and_delegates() {
        let source = "func mk(n int) fun(int) int {
    return func(k int) int { return k + n; };
}
func Main() {
    var i int;
    for (i = 0; i < 3; i++) {
        if (i == 1) { println(!true); } else { println(-i); }
    }
}";
        let out = generate(source).primary.source;
        assert!(out.contains("\tstatic Func<int,int> mk(int n)\n\t{\n\t\treturn delegate(int k)\n\t\t{\n\t\t\treturn (k + n);\n\t\t};\n\t}"),
                "{out}");
        assert!(out.contains("\t\tfor (i = 0 ; (i < 3) ; i = (i + 1))\n\t\t{\n"), "{out}");
        assert!(out.contains("\t\t\tif ((i == 1))\n\t\t\t{\n\t\t\t\tConsole.Write((!true));"), "{out}");
        assert!(out.contains("\t\t\t}\n\t\t\telse\n\t\t\t{\n\t\t\t\tConsole.Write((-i));"), "{out}");
    }

    #[test]
    fn async_reads_wait_for_the_task() {
        let source = "func slow(n int) int { return n * 2; }
func Main() {
    var r int;
    r = async(slow(4));
    println(r);
}";
        let out = generate(source).primary.source;
        let expected = "\t\tint r;
\t\tr = 0;
\t\tTask Task_r = new Task(delegate() { r = slow(4); });
\t\tTask_r.Start();
\t\tTask_r.Wait();
\t\tConsole.Write(r);
\t\tConsole.WriteLine();
";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn repeated_async_reuses_the_task_variable() {
        let source = "func slow(n int) int { return n; }
func Main() {
    var r int;
    r = async(slow(1));
    r = async(slow(2));
    println(r);
}";
        let out = generate(source).primary.source;
        assert_eq!(out.matches("Task Task_r = ").count(), 1, "{out}");
        assert!(out.contains("\t\tTask_r = new Task(delegate() { r = slow(2); });\n"), "{out}");

        let source = "func slow(n int) int { return n; }
func Main() {
    var r int;
    { r = async(slow(1)); }
    { r = async(slow(2)); }
}";
        let out = generate(source).primary.source;
        assert_eq!(out.matches("\t\t\tTask Task_r = ").count(), 2, "{out}");
    }

    #[test]
    fn readln_converts_with_fallback_message() {
        let out = generate("func Main() { var c char; var b bool; c = readln(); b = readln(); }").primary
                                                                                                .source;
        assert!(out.contains("\t\tc = '0';\n\t\tstring input_0 = Console.ReadLine();\n\t\ttry { c = Convert.ToChar(input_0); }\n"),
                "{out}");
        assert!(out.contains("try { b = Convert.ToBoolean(input_1); }"), "{out}");
        assert!(out.contains("catch (FormatException) { Console.WriteLine(\"Cannot convert the text \\\"\" + input_1 + \"\\\" into a value of type bool.\"); }"),
                "{out}");
    }

    #[test]
    fn dasync_generates_client_task_and_server() {
        let generated = generate(REMOTE);
        let client = &generated.primary.source;
        assert!(client.contains("\t\t\t\t\tADD_Interface remoteObject = (ADD_Interface)Activator.GetObject(typeof(ADD_Interface), addr);\n\t\t\t\t\ts = remoteObject.add(1,2);\n"),
                "{client}");
        assert!(client.contains("\t\tTask_s.Start();\n\t\tTask_s.Wait();\n"), "{client}");
        assert!(client.contains("\t\tTask Task_s = new Task(\n"), "{client}");

        assert_eq!(generated.servers.len(), 1);
        let server = &generated.servers[0];
        assert_eq!(server.name, "ADD_Server");
        assert!(server.source.starts_with(PREAMBLE));
        assert!(server.source.contains("public interface ADD_Interface\n{\n\tint add(int a,int b);\n}\n"));
        assert!(server.source
                      .contains("public class ADD : MarshalByRefObject, ADD_Interface\n{\n\tpublic string addr = \"tcp://localhost:9090/adder\";\n\tpublic int add(int a,int b)\n"));
        assert!(!server.source.contains("void Main()\n\t{\n\t\tint s;"));
        assert!(server.source.contains("new TcpChannel(9090)"));
        assert!(server.source.contains("Type.GetType(\"ADD\"), \"adder\", WellKnownObjectMode.SingleCall"));
        assert!(generated.references.is_empty());
    }

    #[test]
    fn repeated_dasync_generates_one_server() {
        let source = REMOTE.replace("println(s);", "s = dasync(addr, add(3, 4));\n    println(s);");
        let generated = generate(&source);
        assert_eq!(generated.servers.len(), 1);
        assert_eq!(generated.primary.source.matches("Task Task_s = ").count(), 1);
        assert!(generated.primary.source.contains("\t\tTask_s = new Task(\n"));
    }

    #[test]
    fn toolchain_builds_servers_then_primary() {
        let mut recorder = Recorder::default();
        let generated = crate::compile(REMOTE, "Client", Some(&mut recorder)).unwrap();
        assert_eq!(recorder.builds,
                   vec![("ADD_Server".to_string(), UnitKind::Library, vec![]),
                        ("ADD_Server".to_string(), UnitKind::Executable, vec![]),
                        ("Client".to_string(), UnitKind::Executable, vec!["ADD_Server".to_string()]),]);
        assert_eq!(generated.references, ["ADD_Server"]);
        assert!(generated.diagnostics.is_empty());
    }

    #[test]
    fn build_failures_become_diagnostics() {
        let mut recorder = Recorder { failing: Some(UnitKind::Library),
                                      ..Recorder::default() };
        let generated = crate::compile(REMOTE, "Client", Some(&mut recorder)).unwrap();
        assert_eq!(generated.diagnostics, ["ADD_Server (Library): error CS0246"]);
        assert_eq!(generated.servers.len(), 1);
    }

    #[test]
    fn remote_address_must_be_known() {
        let source = "func add(a int) int { return a; }
func Main() {
    var addr url;
    var s int;
    addr = readln();
    s = dasync(addr, add(1));
}";
        let (program, annotations) = check_source(source).unwrap();
        let result = Generator::new(&program, &annotations, None).generate("Program");
        assert!(matches!(result, Err(RuntimeError::UnknownRemoteAddress { .. })));
    }

    #[test]
    fn remote_function_must_be_global() {
        let source = "func Main() {
    var addr url = tcp://h:1/o;
    func local(a int) int { return a; }
    var s int;
    s = dasync(addr, local(1));
}";
        let (program, annotations) = check_source(source).unwrap();
        let result = Generator::new(&program, &annotations, None).generate("Program");
        assert!(matches!(result, Err(RuntimeError::RemoteFunctionNotFound { .. })));
    }
}
