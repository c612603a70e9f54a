use std::{
    collections::VecDeque,
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use fwap::{
    compile,
    config::{AppConfig, ColorChoice},
    diagnostic::render,
    error::Error,
    interpret,
    interpreter::{
        codegen::toolchain::{CommandToolchain, Toolchain},
        evaluator::console::Console,
    },
    parse,
    tokenize,
};
use owo_colors::OwoColorize;
use tracing::{debug, info};

/// fwap runs programs written in a small imperative teaching language, or
/// translates them to C#.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// More log output; repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the tokens of a file, comments included.
    Tokens { file: PathBuf },
    /// Parses a file and prints its syntax tree as an outline.
    Parse { file: PathBuf },
    /// Checks and runs a file.
    Run {
        file:  PathBuf,
        /// A line to answer `readln` with; repeat for more lines. Reads past
        /// the scripted lines come from stdin.
        #[arg(short, long = "input", value_name = "LINE")]
        input: Vec<String>,
    },
    /// Checks a file and writes its C# translation.
    Compile {
        file:     PathBuf,
        /// Directory the `.cs` units are written to.
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir:  PathBuf,
        /// Name of the main unit; defaults to the file stem.
        #[arg(short, long)]
        name:     Option<String>,
        /// A `csc`-compatible compiler used to build the units.
        #[arg(long, value_name = "PATH")]
        compiler: Option<PathBuf>,
    },
}

/// Console on the process's stdin and stdout.
struct StdConsole {
    scripted: VecDeque<String>,
}

impl Console for StdConsole {
    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn read_line(&mut self) -> io::Result<String> {
        if let Some(line) = self.scripted.pop_front() {
            return Ok(line);
        }
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = AppConfig::new(args.color, args.verbose, args.quiet);
    let explicit = args.verbose > 0 || args.quiet;
    let _ = tracing_subscriber::fmt().with_env_filter(config.log_filter(explicit))
                                     .with_writer(io::stderr)
                                     .try_init();

    let file = match &args.command {
        Command::Tokens { file } | Command::Parse { file } | Command::Run { file, .. } | Command::Compile { file, .. } => file,
    };
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read the input file '{}': {e}", file.display());
            return ExitCode::FAILURE;
        },
    };
    debug!(file = %file.display(), bytes = source.len(), "read source");

    match execute(args.command, &source, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", render(&source, &e, config.color_enabled));
            ExitCode::FAILURE
        },
    }
}

fn execute(command: Command, source: &str, config: &AppConfig) -> Result<(), Error> {
    match command {
        Command::Tokens { .. } => {
            for token in tokenize(source)? {
                println!("{token}");
            }
        },
        Command::Parse { .. } => print!("{}", parse(source)?.outline()),
        Command::Run { input, .. } => {
            let mut console = StdConsole { scripted: input.into() };
            interpret(source, &mut console)?;
        },
        Command::Compile { file,
                           out_dir,
                           name,
                           compiler, } => {
            let name = name.unwrap_or_else(|| unit_name(&file));
            let mut toolchain = compiler.map(|c| CommandToolchain::new(c, &out_dir));
            let generated = compile(source,
                                    &name,
                                    toolchain.as_mut().map(|t| t as &mut dyn Toolchain))?;

            for unit in std::iter::once(&generated.primary).chain(&generated.servers) {
                let path = out_dir.join(format!("{}.cs", unit.name));
                match fs::write(&path, &unit.source) {
                    Ok(()) => info!(path = %path.display(), "wrote unit"),
                    Err(e) => eprintln!("Failed to write '{}': {e}", path.display()),
                }
                println!("Code translated into C# file \"{}\"", path.display());
            }
            for diagnostic in &generated.diagnostics {
                if config.color_enabled {
                    eprintln!("{}: {diagnostic}", "warning".yellow().bold());
                } else {
                    eprintln!("warning: {diagnostic}");
                }
            }
        },
    }
    Ok(())
}

fn unit_name(file: &Path) -> String {
    file.file_stem()
        .map_or_else(|| "Program".to_string(), |stem| stem.to_string_lossy().into_owned())
}
