///
/// sable CLI - The sable language command-line interface
///
/// Provides commands for inspecting and checking sable code:
/// - sable lex <file>: Print the token stream
/// - sable parse <file>: Print the AST outline
/// - sable check <path>: Analyze a file or every .sbl file below a directory
///
/// Global options pick the config file and the log verbosity. Any failure
/// exits with status 1.
///

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

use sablec::ast::{print_tree, NodeRef};
use sablec::driver::{check_source, collect_sources, read_source};
use sablec::{parse, Config, DiagnosticReporter, Lexer, Library, SourceFile};

#[derive(Parser)]
#[command(name = "sable")]
#[command(author, version, about = "The sable language front end", long_about = None)]
struct Cli {
    /// Config file (defaults to ./sable.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a file
    Lex {
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Include whitespace and comments
        #[arg(long)]
        trivia: bool,
    },

    /// Print the AST outline of a file
    Parse { file: PathBuf },

    /// Analyze a file or directory
    Check {
        /// File or directory to check
        path: Option<PathBuf>,

        /// Print the symbols of each checked file
        #[arg(long)]
        symbols: bool,
    },
}

#[derive(Serialize)]
struct TokenRecord<'s> {
    kind: String,
    text: &'s str,
    position: u32,
    length: u32,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::discover(cli.config.as_deref(), Path::new(".")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        config.log_level().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();

    let lexer = match config.tables() {
        Ok(tables) => Lexer::new(tables),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Lex { file, json, trivia } => lex_file(&lexer, &file, json, trivia),
        Commands::Parse { file } => parse_file(&lexer, &file),
        Commands::Check { path, symbols } => check_path(&lexer, path.as_deref(), symbols),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn load(path: &Path) -> Option<SourceFile> {
    match read_source(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            None
        }
    }
}

fn lex_file(lexer: &Lexer, file: &Path, json: bool, trivia: bool) -> bool {
    let Some(source) = load(file) else {
        return false;
    };
    let (tokens, _interner) = lexer.tokenize(&source.source);
    let records: Vec<TokenRecord> = tokens
        .iter()
        .filter(|t| trivia || !t.is_trivia())
        .map(|t| TokenRecord {
            kind: t.kind.to_string(),
            text: t.text(&source.source),
            position: t.position(),
            length: t.len(),
        })
        .collect();

    if json {
        match serde_json::to_string_pretty(&records) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing tokens: {}", e);
                return false;
            }
        }
    } else {
        for record in &records {
            let (line, col) = source.line_col(record.position);
            println!("{:>4}:{:<4} {:<20} {:?}", line, col, record.kind, record.text);
        }
    }
    true
}

fn parse_file(lexer: &Lexer, file: &Path) -> bool {
    let Some(source) = load(file) else {
        return false;
    };
    let (tokens, interner) = lexer.tokenize(&source.source);

    match parse(&tokens, &source.source) {
        Ok(block) => {
            print!("{}", print_tree(NodeRef::Block(&block), &interner));
            true
        }
        Err(err) => {
            DiagnosticReporter::new(&source).report_parse_error(&err);
            false
        }
    }
}

fn check_path(lexer: &Lexer, path: Option<&Path>, show_symbols: bool) -> bool {
    let path = path.unwrap_or(Path::new("."));
    if !path.exists() {
        eprintln!("Error: {} does not exist", path.display());
        return false;
    }

    let core = Arc::new(Library::core());
    let mut checked = 0;
    let mut failed = 0;

    for file in collect_sources(path) {
        checked += 1;
        let Some(source) = load(&file) else {
            failed += 1;
            continue;
        };

        let outcome = check_source(lexer, &core, &source);
        let reporter = DiagnosticReporter::new(&source);
        if let Some(err) = &outcome.parse_error {
            reporter.report_parse_error(err);
        }
        reporter.report_semantic_errors(&outcome.semantic_errors);

        if show_symbols && outcome.parse_error.is_none() {
            println!("{}:", source.name);
            print!("{}", outcome.symbols);
        }
        if !outcome.is_ok() {
            failed += 1;
        }
    }

    println!("Checked {} files, {} with errors", checked, failed);
    failed == 0
}
