use std::{fs, io, path::Path};

use fwap::{
    error::{Error, ParseError, RuntimeError, SemanticError},
    interpret,
    interpreter::{checker::core::check, evaluator::console::Console},
    parse,
    run,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn sample_programs_work() {
    let mut count = 0;

    for entry in WalkDir::new("programs").into_iter()
                                         .filter_map(Result::ok)
                                         .filter(|e| e.path().extension().is_some_and(|ext| ext == "fw"))
    {
        let path = entry.path();
        let source = read(path);
        let expected = read(&path.with_extension("out"));
        let input = path.with_extension("in");
        let lines: Vec<String> = if input.exists() {
            read(&input).lines().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        count += 1;
        match run(&source, lines) {
            Ok(output) => assert_eq!(output, expected, "output of {path:?}"),
            Err(e) => panic!("Program {path:?} failed:\n{source}\nError: {e}"),
        }
    }

    assert!(count > 0, "No sample programs found in programs/");
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

fn assert_output(src: &str, expected: &str) {
    assert_output_with(src, &[], expected);
}

fn assert_output_with(src: &str, input: &[&str], expected: &str) {
    match run(src, input.iter().copied()) {
        Ok(output) => assert_eq!(output, expected),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_failure(src: &str) -> Error {
    match run(src, Vec::<String>::new()) {
        Ok(output) => panic!("Script succeeded but was expected to fail; it printed {output:?}"),
        Err(e) => e,
    }
}

#[test]
fn arithmetic_and_printing() {
    assert_output("func Main() { println(3+4); }", "7\n");
    assert_output("func Main() { println(7 / 2, ' ', -7 / 2, ' ', 2 * 3 - 4); }", "3 -3 2\n");
    assert_output("func Main() { println(1, 'a', \"bc\", true, false); }", "1abctruefalse\n");
    assert_output("func Main() { println(\"ab\" + \"cd\"); }", "abcd\n");
}

#[test]
fn logic_and_comparisons() {
    assert_output("func Main() { println(2 < 3, 3 <= 2, 'a' < 'b', 2 != 3); }", "truefalsetruetrue\n");
    assert_output("func Main() { println(!false && true, false || false, true == false); }",
                  "truefalsefalse\n");
}

#[test]
fn both_operands_are_evaluated() {
    let source = "var calls int = 0;
func hit() bool { calls++; return true; }
func Main() {
    var b bool = true || hit();
    b = false && hit();
    println(calls);
}";
    assert_output(source, "2\n");
}

#[test]
fn loops_and_compound_assignments() {
    let source = "func Main() {
    var i int;
    var sum int = 0;
    for (i = 1; i <= 5; i++) { sum += i; }
    while (sum > 10) { sum -= 4; }
    i--;
    println(sum, ' ', i);
}";
    assert_output(source, "7 5\n");
}

#[test]
fn multi_variable_declarations() {
    assert_output("func Main() { var a = 1, b, c = a + 1 int; b = 5; println(a, b, c); }", "152\n");
}

#[test]
fn recursion_and_early_return() {
    let source = "func fib(n int) int {
    if (n < 2) { return n; }
    return fib(n - 1) + fib(n - 2);
}
func Main() { println(fib(15)); }";
    assert_output(source, "610\n");
}

#[test]
fn return_leaves_loops() {
    let source = "func first(limit int) int {
    var i int;
    for (i = 0; i < limit; i++) {
        if (i * i > 20) { return i; }
    }
    return -1;
}
func Main() { println(first(100), first(3)); }";
    assert_output(source, "5-1\n");
}

#[test]
fn blocks_shadow_and_assign_outward() {
    let source = "var x int = 1;
func Main() {
    {
        var x bool = true;
        println(x);
    }
    {
        x = 7;
    }
    println(x);
}";
    assert_output(source, "true\n7\n");
}

#[test]
fn same_block_redeclaration() {
    assert_output("func Main() { var x int = 1; var x int = 2; println(x); }", "2\n");
    let err = assert_failure("func Main() { var x int = 1; var x bool = true; }");
    assert!(matches!(err, Error::Semantic(SemanticError::ConflictingDeclaration { .. })), "{err}");
}

#[test]
fn type_errors_are_found_before_running() {
    let err = assert_failure("func Main() {\n    var x int = 1;\n    println(\"started\");\n    x = x + true;\n}");
    match err {
        Error::Semantic(SemanticError::OperandMismatch { at, .. }) => {
            assert_eq!((at.line, at.column), (4, 11));
        },
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn division_by_zero_fails_at_run_time() {
    let err = assert_failure("func Main() { var y int = 0; println(10 / y); }");
    assert!(matches!(err, Error::Runtime(RuntimeError::DivisionByZero { .. })), "{err}");
}

#[test]
fn integer_overflow_is_error() {
    let err = assert_failure("func Main() { var m int = 2147483647; println(m + 1); }");
    assert!(matches!(err, Error::Runtime(RuntimeError::Overflow { .. })), "{err}");
    let err = assert_failure("func Main() { var m int = 0 - 2147483647 - 1; println(-m); }");
    assert!(matches!(err, Error::Runtime(RuntimeError::Overflow { .. })), "{err}");
}

#[test]
fn reading_unassigned_variable_is_error() {
    let err = assert_failure("func Main() { var x int; println(x); }");
    assert!(matches!(err, Error::Runtime(RuntimeError::Uninitialized { .. })), "{err}");
}

#[test]
fn readln_echoes_and_converts() {
    let source = "func Main() {
    var n int;
    var c char;
    var s string;
    var u url;
    n = readln();
    c = readln();
    s = readln();
    u = readln();
    println(n + 1, c, s, u);
}";
    assert_output_with(source,
                       &["41", "z", "hi there", "tcp://host:80/obj"],
                       "41\nz\nhi there\ntcp://host:80/obj\n42zhi theretcp://host:80/obj\n");
}

#[test]
fn readln_rejects_bad_text() {
    let source = "func Main() { var n int; n = readln(); }";
    match run(source, ["forty"]) {
        Err(Error::Runtime(RuntimeError::InvalidInput { text, .. })) => assert_eq!(text, "forty"),
        other => panic!("unexpected result {other:?}"),
    }
    let source = "func Main() { var u url; u = readln(); }";
    assert!(matches!(run(source, ["http://x"]), Err(Error::Runtime(RuntimeError::InvalidUrl { .. }))));
}

#[test]
fn readln_into_function_is_rejected() {
    let err = assert_failure("func Main() { var f fun() int; f = readln(); }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnreadableType { .. })), "{err}");
}

#[test]
fn concurrency_needs_compilation() {
    let err = assert_failure("func Main() { var r int; r = async(1 + 2); }");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::UnsupportedConcurrency { construct: "async", .. })),
            "{err}");
}

#[test]
fn closure_copies_the_creating_frame() {
    let source = "func make() fun() int {
    var x int = 1;
    func bump() { x = x + 10; }
    return func() int { bump(); return x; };
}
func Main() {
    var f fun() int = make();
    println(f());
}";
    assert_output(source, "1\n");
}

#[test]
fn closure_shares_the_enclosing_scopes() {
    let source = "var g int = 1;
func outer() int {
    var r int = 0;
    func mk() fun() int { return func() int { return g + r; }; }
    var f fun() int = mk();
    var g int = 100;
    r = 10;
    return f();
}
func Main() { println(outer()); }";
    assert_output(source, "110\n");
}

#[test]
fn functions_as_values() {
    let source = "func adder(n int) fun(int) int { return func(k int) int { return k + n; }; }
func apply(x int) int { var add fun(int) int = adder(x); return add(x); }
func Main() {
    var plus fun(int) int = adder(3);
    println(plus(4), ' ', apply(5));
    println(plus);
}";
    assert_output(source, "7 10\nfunc(int k) int\n");
}

#[test]
fn missing_return_value_is_error() {
    let err = assert_failure("func f() int { } func Main() { println(f()); }");
    assert!(matches!(err, Error::Semantic(SemanticError::MissingReturn { .. })), "{err}");
    let err = assert_failure("func g() { } func Main() { var x int = g(); }");
    assert!(matches!(err, Error::Semantic(SemanticError::NoValue { .. })), "{err}");
}

#[test]
fn call_errors() {
    let err = assert_failure("func f(a int) int { return a; } func Main() { println(f(1, 2)); }");
    assert!(matches!(err, Error::Semantic(SemanticError::ArityMismatch { .. })), "{err}");
    let err = assert_failure("func f(a int) int { return a; } func Main() { println(f(true)); }");
    assert!(matches!(err, Error::Semantic(SemanticError::ArgumentMismatch { index: 1, .. })),
            "{err}");
    let err = assert_failure("func Main() { var x int = 1; x(); }");
    assert!(matches!(err, Error::Semantic(SemanticError::NotCallable { .. })), "{err}");
}

#[test]
fn unknown_identifier_is_error() {
    let err = assert_failure("func Main() { println(foo); }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnknownIdentifier { .. })), "{err}");
}

#[test]
fn deep_recursion_runs_on_any_thread() {
    let source = "func sum(n int) int {
    if (n == 0) { return 0; }
    return n + sum(n - 1);
}
func Main() { println(sum(1000)); }";
    assert_output(source, "500500\n");
}

#[test]
fn runaway_recursion_is_stopped() {
    let err = assert_failure("func down(n int) int { return down(n + 1); }
func Main() { println(down(0)); }");
    match err {
        Error::Runtime(RuntimeError::StackOverflow { name, .. }) => assert_eq!(name, "down"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn parse_errors() {
    assert!(matches!(parse("var x int = 1;"), Err(Error::Parse(_))));
    assert!(matches!(parse("func Main() { x += ; }"), Err(Error::Parse(_))));
    assert!(matches!(parse("func Main() { # }"), Err(Error::Lexical(_))));
}

#[test]
fn nothing_may_follow_main() {
    assert!(matches!(parse("func Main() { } var x int;"),
                     Err(Error::Parse(ParseError::UnexpectedTrailingTokens { .. }))));
    assert!(matches!(parse("func Main() { } }"),
                     Err(Error::Parse(ParseError::UnexpectedTrailingTokens { .. }))));
}

#[test]
fn parameters_must_be_scalars() {
    let err = parse("func apply(f fun() int) int { return f(); } func Main() { }").unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::ScalarTypeRequired { .. })), "{err}");
    let err = parse("func Main() { var g fun(fun() int) int; }").unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::ScalarTypeRequired { .. })), "{err}");
}

#[test]
fn integer_literal_must_fit() {
    assert_output("func Main() { println(2147483647); }", "2147483647\n");
    let err = parse("func Main() { var x int = 2147483648; }").unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::LiteralTooLarge { .. })), "{err}");
}

#[test]
fn operators_need_supported_types() {
    let err = assert_failure("func Main() { var b bool = true + false; }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnsupportedOperation { .. })), "{err}");
    let err = assert_failure("func Main() { var s string = \"a\" * \"b\"; }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnsupportedOperation { .. })), "{err}");
    let err = assert_failure("func Main() { var b bool = -true; }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnsupportedUnaryOperation { .. })), "{err}");
    let err = assert_failure("func Main() { var n int = !1; }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnsupportedUnaryOperation { .. })), "{err}");
}

#[test]
fn initializer_must_match_declared_type() {
    let err = assert_failure("func Main() { var x int = \"a\"; }");
    assert!(matches!(err, Error::Semantic(SemanticError::TypeMismatch { .. })), "{err}");
}

#[test]
fn conditions_must_be_boolean() {
    let err = assert_failure("func Main() { while (1) { } }");
    assert!(matches!(err, Error::Semantic(SemanticError::ConditionNotBoolean { .. })), "{err}");
    let err = assert_failure("func Main() { if ('c') { } }");
    assert!(matches!(err, Error::Semantic(SemanticError::ConditionNotBoolean { .. })), "{err}");
}

#[test]
fn branches_must_agree_on_returning() {
    let source = "func pick(b bool) int {
    if (b) { return 1; } else { println(2); }
    return 3;
}
func Main() { println(pick(true)); }";
    let err = assert_failure(source);
    assert!(matches!(err, Error::Semantic(SemanticError::BranchMismatch { .. })), "{err}");

    let source = "func pick(b bool) int {
    if (b) { return 1; } else { return 2; }
}
func Main() { println(pick(false)); }";
    assert_output(source, "2\n");
}

#[test]
fn returns_must_match_the_signature() {
    let err = assert_failure("func f() int { return true; } func Main() { }");
    assert!(matches!(err, Error::Semantic(SemanticError::ReturnTypeMismatch { .. })), "{err}");

    let err = assert_failure("func f() { return 1; } func Main() { f(); }");
    assert!(matches!(err, Error::Semantic(SemanticError::UnexpectedReturnValue { .. })), "{err}");

    let source = "func mk() fun(int) int {
    return func(k int) bool { return k > 0; };
}
func Main() { }";
    let err = assert_failure(source);
    assert!(matches!(err, Error::Semantic(SemanticError::ReturnTypeMismatch { ref function, .. }) if function == "mk"),
            "{err}");
    assert!(err.to_string()
               .contains("returns fun(int) bool, which does not match the declared type fun(int) int"),
            "{err}");
}

#[test]
fn remote_address_must_be_url() {
    let source = "func add(a int) int { return a; }
func Main() {
    var addr int = 1;
    var s int;
    s = dasync(addr, add(1));
}";
    let err = assert_failure(source);
    assert!(matches!(err, Error::Semantic(SemanticError::ExpectedUrl { .. })), "{err}");
}

#[test]
fn remote_calls_need_compilation() {
    let source = "var addr url = tcp://localhost:9090/adder;
func add(a int) int { return a; }
func Main() {
    var s int;
    s = dasync(addr, add(1));
}";
    let err = assert_failure(source);
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::UnsupportedConcurrency { construct: "dasync", .. })),
            "{err}");
}

struct BrokenInput;

impl Console for BrokenInput {
    fn print(&mut self, _text: &str) {}

    fn read_line(&mut self) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
    }
}

#[test]
fn failing_console_stops_readln() {
    let err = interpret("func Main() { var n int; n = readln(); }", &mut BrokenInput).unwrap_err();
    match err {
        Error::Runtime(RuntimeError::InputUnavailable { details, .. }) => assert_eq!(details, "stdin closed"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn comments_are_ignored() {
    assert_output("// greeting\nfunc Main() { /* say */ println(\"hi\"); }", "hi\n");
}

#[test]
fn checking_is_repeatable() {
    let source = "func slow(n int) int { return n; }
func Main() { var r int; r = async(slow(1)); println(r); }";
    let program = parse(source).unwrap();
    let first = check(&program).unwrap();
    let second = check(&program).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.async_reads.len(), 1);
}

#[test]
fn outline_lists_nodes() {
    let program = parse("var x int = 5; func Main() { if (x > 1) { println(x); } }").unwrap();
    let expected = "Program
  Declaration x: int
    Constant int 5
  Function Main fun()
    Block
      If
        Binary >
          Var x
          Constant int 1
        Then
          Println
            Var x
";
    assert_eq!(program.outline(), expected);
}
