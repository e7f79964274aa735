//! Monkey front end CLI

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use monkey_error::{DiagnosticRenderer, Diagnostics, SourceCache};
use monkey_lexer::Lexer;
use monkey_parser::{parse_with_options, ParserOptions, RecoveryMode};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};

/// How the parser recovers from a broken statement
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Recovery {
    /// Step over one token and retry (default)
    #[default]
    Skip,
    /// Skip to the next `;`
    Sync,
}

impl From<Recovery> for RecoveryMode {
    fn from(recovery: Recovery) -> Self {
        match recovery {
            Recovery::Skip => RecoveryMode::SkipToken,
            Recovery::Sync => RecoveryMode::Synchronize,
        }
    }
}

#[derive(ClapParser)]
#[command(name = "monkey")]
#[command(author = "Guilherme Mendes")]
#[command(version = "0.1.0")]
#[command(about = "Monkey language lexer and parser", long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable ANSI colors in diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows file tokens
    Lex {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parses a file and prints the program
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Recovery strategy after a syntax error
        #[arg(short, long, default_value = "skip")]
        recovery: Recovery,

        /// Also print the debug tree
        #[arg(long)]
        tree: bool,
    },

    /// Reads lines from stdin and parses each one
    Repl {
        /// Print tokens instead of statements
        #[arg(long)]
        tokens: bool,

        #[arg(short, long, default_value = "skip")]
        recovery: Recovery,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{count} error(s) found")]
    Diagnostics { count: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, CliError>;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn renderer(cache: &SourceCache, no_color: bool) -> DiagnosticRenderer<'_> {
    let renderer = DiagnosticRenderer::new(cache);
    if no_color {
        renderer.without_colors()
    } else {
        renderer
    }
}

fn report(diagnostics: &Diagnostics, renderer: &DiagnosticRenderer<'_>) {
    for diag in diagnostics {
        eprintln!("{}", renderer.render(diag));
    }
}

fn lex_file(input: &Path, no_color: bool) -> Result<()> {
    let source = read_source(input)?;
    let mut cache = SourceCache::new();
    let file_id = cache.add(input.display().to_string(), source.as_str());

    let mut lexer = Lexer::new(&source, file_id);
    let tokens = lexer.tokenize();
    let diagnostics = lexer.take_diagnostics();

    for token in &tokens {
        println!(
            "  {:4}:{:<3}  {:<8}  {:?}",
            token.span.start.line,
            token.span.start.column,
            token.kind.to_string(),
            token.literal
        );
    }
    println!("\nTotal: {} tokens", tokens.len());

    report(&diagnostics, &renderer(&cache, no_color));
    if diagnostics.has_errors() {
        return Err(CliError::Diagnostics {
            count: diagnostics.len(),
        });
    }
    Ok(())
}

fn parse_file(input: &Path, options: ParserOptions, tree: bool, no_color: bool) -> Result<()> {
    let source = read_source(input)?;
    let mut cache = SourceCache::new();
    let file_id = cache.add(input.display().to_string(), source.as_str());

    let (program, diagnostics) = parse_with_options(&source, file_id, options);
    debug!(recovery = ?options.recovery, statements = program.len(), "parsed {}", input.display());

    // A partial program is still worth showing
    println!("{}", program);
    if tree {
        println!("\n{:#?}", program);
    }

    report(&diagnostics, &renderer(&cache, no_color));
    if diagnostics.has_errors() {
        return Err(CliError::Diagnostics {
            count: diagnostics.len(),
        });
    }
    Ok(())
}

fn repl(tokens: bool, options: ParserOptions, no_color: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut cache = SourceCache::new();

    loop {
        write!(stdout, ">> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        // Only the current line is ever rendered
        cache.clear();
        let file_id = cache.add("<repl>", line.as_str());

        if tokens {
            let mut lexer = Lexer::new(&line, file_id);
            for token in lexer.tokenize() {
                if token.is_eof() {
                    break;
                }
                writeln!(stdout, "{:?}", (token.kind, &token.literal))?;
            }
            report(&lexer.take_diagnostics(), &renderer(&cache, no_color));
            continue;
        }

        let (program, diagnostics) = parse_with_options(&line, file_id, options);
        if !program.is_empty() {
            writeln!(stdout, "{}", program)?;
        }
        report(&diagnostics, &renderer(&cache, no_color));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Lex { input } => lex_file(&input, cli.no_color),
        Commands::Parse { input, recovery, tree } => {
            let options = ParserOptions {
                recovery: recovery.into(),
            };
            parse_file(&input, options, tree, cli.no_color)
        }
        Commands::Repl { tokens, recovery } => {
            let options = ParserOptions {
                recovery: recovery.into(),
            };
            repl(tokens, options, cli.no_color)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
