//!
//! Driver Helpers
//!
//! The pieces of the `sable` command that are worth testing without a
//! process: finding `.sbl` files below a path and running one file through
//! the whole front end (lex, parse, analyze against the core library).
//!

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::lexer::Lexer;
use crate::parser::{parse, ParseError};
use crate::semantic::{analyze, Library, SemanticError};
use crate::source::SourceFile;

pub const SOURCE_EXTENSION: &str = "sbl";

/// `path` itself when it is a file, otherwise every `.sbl` file below it in
/// sorted order.
pub fn collect_sources(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect();
    files.sort();
    debug!(root = %path.display(), files = files.len(), "collected sources");
    files
}

pub fn read_source(path: &Path) -> std::io::Result<SourceFile> {
    let text = std::fs::read_to_string(path)?;
    Ok(SourceFile::new(path.display().to_string(), text))
}

#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub parse_error: Option<ParseError>,
    pub semantic_errors: Vec<SemanticError>,
    /// `Library::describe` of the analyzed unit.
    pub symbols: String,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.parse_error.is_none() && self.semantic_errors.is_empty()
    }
}

pub fn check_source(lexer: &Lexer, core: &Arc<Library>, source: &SourceFile) -> CheckOutcome {
    let (tokens, interner) = lexer.tokenize(&source.source);
    let block = match parse(&tokens, &source.source) {
        Ok(block) => block,
        Err(err) => {
            return CheckOutcome {
                parse_error: Some(err),
                ..CheckOutcome::default()
            };
        }
    };

    let mut library = Library::new(source.name.clone());
    let analysis = analyze(&block, &interner, &[core.clone()], &mut library);
    info!(
        file = %source.name,
        symbols = library.symbols().len(),
        errors = analysis.errors.len(),
        "checked file"
    );

    CheckOutcome {
        parse_error: None,
        semantic_errors: analysis.errors,
        symbols: library.describe(),
    }
}
